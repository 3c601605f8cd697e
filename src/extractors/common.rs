//! Shared tree navigation and extraction helpers

use std::collections::BTreeMap;

use tree_sitter::Node;

use crate::schema::AnnotationInfo;

/// Get text content of a node
pub fn node_text(node: &Node, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or("").to_string()
}

/// Visit every node in a subtree, preorder
pub fn visit_all<F>(node: &Node, visitor: &mut F)
where
    F: FnMut(&Node),
{
    visitor(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_all(&child, visitor);
    }
}

/// Find the first direct child with one of the given kinds
pub fn child_of_kind<'a>(node: &Node<'a>, kinds: &[&str]) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|c| kinds.contains(&c.kind()));
    found
}

/// Collect all direct children with one of the given kinds
pub fn children_of_kind<'a>(node: &Node<'a>, kinds: &[&str]) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| kinds.contains(&c.kind()))
        .collect()
}

/// Documentation comment attached to a declaration: the block comment
/// immediately preceding it, provided it opens with `/**`. Line comments
/// never count as documentation.
pub fn preceding_doc_comment(node: &Node, source: &str) -> Option<String> {
    let prev = node.prev_sibling()?;
    if !matches!(prev.kind(), "block_comment" | "multiline_comment" | "comment") {
        return None;
    }
    let text = node_text(&prev, source);
    if text.starts_with("/**") {
        Some(text)
    } else {
        None
    }
}

/// Erase generics and nullability from a type name: `List<String>` ->
/// `List`, `Widget?` -> `Widget`.
pub fn type_erasure(ty: &str) -> &str {
    let ty = ty.trim();
    let ty = match ty.find('<') {
        Some(idx) => &ty[..idx],
        None => ty,
    };
    ty.trim_end_matches('?').trim()
}

/// Whether a type or annotation name is qualified (dotted), the unit used
/// for dependency tracking
pub fn is_qualified(name: &str) -> bool {
    name.contains('.')
}

/// Parse one annotation from its literal text, e.g.
/// `@Deprecated("gone")` or `@field:Named(value = "db")`.
///
/// An unnamed single argument maps to the `"value"` key. Use-site targets
/// (`field:`, `get:`, ...) are stripped from the name.
pub fn parse_annotation_text(text: &str) -> Option<AnnotationInfo> {
    let text = text.trim().strip_prefix('@')?;
    let (head, args) = match text.find('(') {
        Some(idx) => (&text[..idx], text[idx..].trim()),
        None => (text, ""),
    };
    // strip a use-site target prefix
    let name = match head.find(':') {
        Some(idx) => &head[idx + 1..],
        None => head,
    };
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut attributes = BTreeMap::new();
    let inner = args
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or("");
    for part in split_top_level(inner) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match split_assignment(part) {
            Some((key, value)) => {
                attributes.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => {
                attributes.insert("value".to_string(), part.to_string());
            }
        }
    }

    Some(AnnotationInfo {
        name: name.to_string(),
        attributes,
    })
}

/// Split an argument list on commas outside of nested brackets and strings
fn split_top_level(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut current = String::new();

    for c in args.chars() {
        match c {
            '"' => {
                in_string = !in_string;
                current.push(c);
            }
            '(' | '[' | '{' | '<' if !in_string => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' | '>' if !in_string => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if !in_string && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }
    parts
}

/// Split `key = value` at the first top-level `=` (ignoring `==`)
fn split_assignment(part: &str) -> Option<(&str, &str)> {
    let bytes = part.as_bytes();
    let idx = part.find('=')?;
    if bytes.get(idx + 1) == Some(&b'=') {
        return None;
    }
    // A lambda arrow or comparison is not an assignment
    if idx == 0 || bytes.get(idx.wrapping_sub(1)) == Some(&b'!') {
        return None;
    }
    Some((&part[..idx], &part[idx + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_annotation() {
        let a = parse_annotation_text("@Override").unwrap();
        assert_eq!(a.name, "Override");
        assert!(a.attributes.is_empty());
    }

    #[test]
    fn test_single_value_annotation_maps_to_value_key() {
        let a = parse_annotation_text(r#"@Deprecated("use other")"#).unwrap();
        assert_eq!(a.name, "Deprecated");
        assert_eq!(a.attributes.get("value").unwrap(), r#""use other""#);
    }

    #[test]
    fn test_named_attributes() {
        let a = parse_annotation_text(r#"@Entity(name = "users", schema = "public")"#).unwrap();
        assert_eq!(a.attributes.get("name").unwrap(), r#""users""#);
        assert_eq!(a.attributes.get("schema").unwrap(), r#""public""#);
    }

    #[test]
    fn test_use_site_target_is_stripped() {
        let a = parse_annotation_text(r#"@field:Named("db")"#).unwrap();
        assert_eq!(a.name, "Named");
    }

    #[test]
    fn test_comma_inside_string_is_not_a_separator() {
        let a = parse_annotation_text(r#"@Doc("a, b")"#).unwrap();
        assert_eq!(a.attributes.get("value").unwrap(), r#""a, b""#);
    }

    #[test]
    fn test_child_of_kind_finds_direct_children() {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse("package p;\nclass A {}", None).unwrap();
        let root = tree.root_node();

        let class = child_of_kind(&root, &["class_declaration"]).unwrap();
        assert_eq!(class.kind(), "class_declaration");
        assert!(child_of_kind(&root, &["import_declaration"]).is_none());
        assert_eq!(children_of_kind(&root, &["package_declaration"]).len(), 1);
    }

    #[test]
    fn test_type_erasure() {
        assert_eq!(type_erasure("List<String>"), "List");
        assert_eq!(type_erasure("Map<String, Int>"), "Map");
        assert_eq!(type_erasure("Widget?"), "Widget");
        assert_eq!(type_erasure("int"), "int");
    }
}
