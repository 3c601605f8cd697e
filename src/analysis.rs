//! Dependency and usage analysis over declaration subtrees
//!
//! Given one method body this module derives which declaring-class fields
//! the body touches, which local variables are live (declared and then
//! referenced), and the outgoing call targets. Resolution of a call to
//! its declaring type is a capability that may be partially available
//! (Java, via [`CallResolver`]) or entirely absent (Kotlin); every path
//! degrades to a syntactic fallback instead of failing.

use std::collections::{BTreeSet, HashSet};

use tree_sitter::Node;

use crate::extractors::common::{is_qualified, node_text, visit_all};

/// Canonical invocation name for the standard-output print call. The
/// underlying library can rarely resolve it, so the fixed form is
/// normalized regardless of resolution outcome.
pub const STDOUT_PRINT: &str = "System.out.println";

/// Best-effort call resolution capability
///
/// `scope` is the literal scope expression of the call when present.
/// A successful resolution returns the declaring type's qualified name.
/// Failure per call is normal and must be swallowed by callers.
pub trait CallResolver {
    fn resolve(&self, scope: Option<&str>, method: &str) -> Option<String>;
}

/// The absent capability: never resolves anything
pub struct NoResolver;

impl CallResolver for NoResolver {
    fn resolve(&self, _scope: Option<&str>, _method: &str) -> Option<String> {
        None
    }
}

/// Per-method usage facts derived from one body traversal
#[derive(Debug, Default)]
pub struct UsageInfo {
    /// Declaring-class field names the body accesses
    pub accessed_fields: BTreeSet<String>,
    /// Local variables declared and referenced at least once
    pub local_variables: BTreeSet<String>,
    /// Call targets, deduplicated in first-seen order
    pub invocations: Vec<String>,
    /// Declaring types of successfully resolved calls (qualified names),
    /// feeding the class-level dependency set
    pub resolved_owners: Vec<String>,
}

/// Filter to qualified names only, deduplicate, and sort ascending
pub fn finish_dependencies(mut deps: Vec<String>) -> Vec<String> {
    deps.retain(|d| is_qualified(d));
    deps.sort();
    deps.dedup();
    deps
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.iter().any(|v| v == &value) {
        list.push(value);
    }
}

/// A local variable counts only when referenced somewhere other than its
/// own declarator.
fn is_referenced(body: &Node, source: &str, name: &str, declarator_id: usize) -> bool {
    let mut found = false;
    visit_all(body, &mut |node: &Node| {
        if found {
            return;
        }
        if matches!(node.kind(), "identifier" | "simple_identifier")
            && node.id() != declarator_id
            && node_text(node, source) == name
        {
            found = true;
        }
    });
    found
}

// ============================================================================
// Java body analysis
// ============================================================================

/// Analyze one Java method body
pub fn analyze_java_body(
    body: &Node,
    source: &str,
    field_names: &BTreeSet<String>,
    resolver: &dyn CallResolver,
) -> UsageInfo {
    let mut usage = UsageInfo::default();
    let mut declared: Vec<(String, usize)> = Vec::new();

    visit_all(body, &mut |node: &Node| match node.kind() {
        "method_invocation" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let method = node_text(&name_node, source);
            let scope = node
                .child_by_field_name("object")
                .map(|o| node_text(&o, source));

            if scope.as_deref() == Some("System.out") && method == "println" {
                push_unique(&mut usage.invocations, STDOUT_PRINT.to_string());
            } else if let Some(owner) = resolver.resolve(scope.as_deref(), &method) {
                push_unique(&mut usage.invocations, format!("{owner}.{method}"));
                usage.resolved_owners.push(owner);
            } else if let Some(scope) = &scope {
                push_unique(&mut usage.invocations, format!("{scope}.{method}"));
            }
            // Unresolvable call with no scope: omitted.
        }
        "identifier" => {
            let text = node_text(node, source);
            if field_names.contains(&text) && !is_java_method_name(node) {
                usage.accessed_fields.insert(text);
            }
        }
        "local_variable_declaration" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "variable_declarator" {
                    if let Some(name_node) = child.child_by_field_name("name") {
                        declared.push((node_text(&name_node, source), name_node.id()));
                    }
                }
            }
        }
        _ => {}
    });

    for (name, declarator_id) in declared {
        if is_referenced(body, source, &name, declarator_id) {
            usage.local_variables.insert(name);
        }
    }

    usage
}

/// An identifier that names the method in a call is a call, not a field
/// access, even when it collides with a field name.
fn is_java_method_name(node: &Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    parent.kind() == "method_invocation"
        && parent
            .child_by_field_name("name")
            .is_some_and(|n| n.id() == node.id())
}

// ============================================================================
// Kotlin body analysis
// ============================================================================

/// Analyze one Kotlin function body. No resolver exists for this dialect,
/// so every call target is the syntactic `scope.method` fallback.
pub fn analyze_kotlin_body(body: &Node, source: &str, field_names: &BTreeSet<String>) -> UsageInfo {
    let mut usage = UsageInfo::default();
    let mut declared: Vec<(String, usize)> = Vec::new();
    let mut callee_ids: HashSet<usize> = HashSet::new();

    visit_all(body, &mut |node: &Node| match node.kind() {
        "call_expression" => {
            let Some(callee) = node.child(0) else { return };
            match callee.kind() {
                "identifier" | "simple_identifier" => {
                    callee_ids.insert(callee.id());
                    let name = node_text(&callee, source);
                    if name == "println" || name == "print" {
                        push_unique(&mut usage.invocations, STDOUT_PRINT.to_string());
                    }
                    // Other bare calls have no scope and stay omitted.
                }
                "navigation_expression" => {
                    if let Some((scope, method)) = split_navigation(&callee, source) {
                        callee_ids.insert(callee.id());
                        if scope == "System.out" && method == "println" {
                            push_unique(&mut usage.invocations, STDOUT_PRINT.to_string());
                        } else {
                            push_unique(&mut usage.invocations, format!("{scope}.{method}"));
                        }
                        if field_names.contains(&scope) {
                            usage.accessed_fields.insert(scope);
                        }
                    }
                }
                _ => {}
            }
        }
        "identifier" | "simple_identifier" => {
            let text = node_text(node, source);
            if field_names.contains(&text) && !is_kotlin_member_name(node, &callee_ids) {
                usage.accessed_fields.insert(text);
            }
        }
        "property_declaration" | "variable_declaration" => {
            // Local `val`/`var`. variable_declaration is nested inside
            // property_declaration; only record the leaf form once.
            if node.kind() == "property_declaration"
                && crate::extractors::common::child_of_kind(node, &["variable_declaration"])
                    .is_some()
            {
                return;
            }
            if let Some(name_node) =
                crate::extractors::common::child_of_kind(node, &["identifier", "simple_identifier"])
            {
                declared.push((node_text(&name_node, source), name_node.id()));
            }
        }
        _ => {}
    });

    for (name, declarator_id) in declared {
        if is_referenced(body, source, &name, declarator_id) {
            usage.local_variables.insert(name);
        }
    }

    usage
}

/// Split `a.b.method` into the scope text and the final member name
fn split_navigation(nav: &Node, source: &str) -> Option<(String, String)> {
    let full = node_text(nav, source);
    let mut cursor = nav.walk();
    let member = nav
        .children(&mut cursor)
        .filter(|c| matches!(c.kind(), "identifier" | "simple_identifier"))
        .last()
        .map(|n| node_text(&n, source))
        .or_else(|| full.rsplit('.').next().map(str::to_string))?;
    let scope = full
        .strip_suffix(member.as_str())
        .and_then(|s| s.strip_suffix('.'))
        .map(str::trim)?;
    if scope.is_empty() {
        return None;
    }
    Some((scope.to_string(), member))
}

/// The final member of a scoped call (`entries.add`) is a method name,
/// not a field access
fn is_kotlin_member_name(node: &Node, callee_ids: &HashSet<usize>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    if parent.kind() != "navigation_expression" {
        return false;
    }
    // Rightmost identifier of a navigation used as a callee
    callee_ids.contains(&parent.id()) && node.next_sibling().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_dependencies_sorts_and_dedups() {
        let deps = finish_dependencies(vec![
            "java.util.List".to_string(),
            "com.example.Widget".to_string(),
            "java.util.List".to_string(),
            "String".to_string(),
        ]);
        assert_eq!(deps, vec!["com.example.Widget", "java.util.List"]);
    }

    #[test]
    fn test_push_unique_preserves_first_seen_order() {
        let mut list = Vec::new();
        push_unique(&mut list, "b.x".to_string());
        push_unique(&mut list, "a.y".to_string());
        push_unique(&mut list, "b.x".to_string());
        assert_eq!(list, vec!["b.x", "a.y"]);
    }
}
