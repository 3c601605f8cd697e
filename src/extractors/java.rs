//! Java source extraction
//!
//! Walks a `tree-sitter-java` syntax tree and populates the structural
//! model. Nested type declarations are not recursed into; one level of
//! method and field enumeration is extracted, matching the behavior of
//! the Java front end. Call resolution is a syntactic best effort built
//! from the file's own imports and member declarations.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::analysis::{analyze_java_body, CallResolver, finish_dependencies};
use crate::docs::parse_javadoc;
use crate::error::{DockitError, Result};
use crate::extractors::common::{
    child_of_kind, is_qualified, node_text, preceding_doc_comment, type_erasure,
};
use crate::extractors::StructureExtractor;
use crate::lang::Lang;
use crate::schema::{AnnotationInfo, ClassInfo, FieldInfo, MethodInfo, ParameterInfo};

/// Extractor for Java-like sources. Stateless: one instance can be
/// reused concurrently.
#[derive(Debug, Default)]
pub struct JavaExtractor;

impl JavaExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl StructureExtractor for JavaExtractor {
    fn parse(&self, source: &str) -> Result<Option<ClassInfo>> {
        let mut parser = Parser::new();
        parser
            .set_language(&Lang::Java.tree_sitter_language())
            .map_err(|e| DockitError::Environment {
                dialect: Lang::Java.name(),
                message: e.to_string(),
            })?;

        let Some(tree) = parser.parse(source, None) else {
            return Ok(None);
        };
        let root = tree.root_node();

        let Some(class_node) = find_primary_declaration(&root) else {
            debug!("no primary type declaration found in java source");
            return Ok(None);
        };

        Ok(Some(extract_class(&root, &class_node, source)))
    }
}

/// First class or interface declaration, preorder
fn find_primary_declaration<'a>(root: &Node<'a>) -> Option<Node<'a>> {
    if matches!(root.kind(), "class_declaration" | "interface_declaration") {
        return Some(*root);
    }
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if let Some(found) = find_primary_declaration(&child) {
            return Some(found);
        }
    }
    None
}

fn extract_class(root: &Node, class_node: &Node, source: &str) -> ClassInfo {
    let name = class_node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source))
        .unwrap_or_default();

    let package_name = extract_package(root, source);
    let imports = extract_imports(root, source);

    let (_, annotations) = extract_modifiers(class_node, source);

    let super_class = class_node
        .child_by_field_name("superclass")
        .and_then(|sc| sc.named_child(0).map(|t| node_text(&t, source)));

    let interfaces = class_node
        .child_by_field_name("interfaces")
        .and_then(|si| child_of_kind(&si, &["type_list"]))
        .map(|list| {
            let mut cursor = list.walk();
            list.named_children(&mut cursor)
                .map(|t| node_text(&t, source))
                .collect()
        })
        .unwrap_or_default();

    let type_parameters = class_node
        .child_by_field_name("type_parameters")
        .map(|tp| {
            let mut cursor = tp.walk();
            tp.named_children(&mut cursor)
                .map(|t| node_text(&t, source))
                .collect()
        })
        .unwrap_or_default();

    let documentation = preceding_doc_comment(class_node, source).map(|c| parse_javadoc(&c));

    let fields = class_node
        .child_by_field_name("body")
        .map(|body| extract_fields(&body, source))
        .unwrap_or_default();

    let field_names: BTreeSet<String> = fields.iter().map(|f| f.name.clone()).collect();

    let resolver = JavaCallResolver::build(
        class_node,
        source,
        &name,
        &package_name,
        &imports,
        &fields,
    );

    let mut dependencies: Vec<String> = imports.values().cloned().collect();

    let methods = class_node
        .child_by_field_name("body")
        .map(|body| extract_methods(&body, source, &field_names, &resolver, &mut dependencies))
        .unwrap_or_default();

    // Qualified type and annotation names count as dependencies too
    for field in &fields {
        if is_qualified(&field.field_type) {
            dependencies.push(type_erasure(&field.field_type).to_string());
        }
    }
    for annotation in &annotations {
        if is_qualified(&annotation.name) {
            dependencies.push(annotation.name.clone());
        }
    }

    ClassInfo {
        name,
        package_name,
        methods,
        fields,
        dependencies: finish_dependencies(dependencies),
        super_class,
        interfaces,
        type_parameters,
        annotations,
        documentation,
        ..Default::default()
    }
}

fn extract_package(root: &Node, source: &str) -> String {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_declaration" {
            if let Some(name) = child.named_child(0) {
                return node_text(&name, source);
            }
        }
    }
    String::new()
}

/// Explicit imports mapped simple-name -> qualified-name
fn extract_imports(root: &Node, source: &str) -> HashMap<String, String> {
    let mut imports = HashMap::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        if let Some(name) = child_of_kind(&child, &["scoped_identifier", "identifier"]) {
            let qualified = node_text(&name, source);
            if let Some(simple) = qualified.rsplit('.').next() {
                imports.insert(simple.to_string(), qualified);
            }
        }
    }
    imports
}

/// Split a declaration's `modifiers` node into plain tokens and annotations
fn extract_modifiers(node: &Node, source: &str) -> (Vec<String>, Vec<AnnotationInfo>) {
    let mut modifiers = Vec::new();
    let mut annotations = Vec::new();

    if let Some(mods) = child_of_kind(node, &["modifiers"]) {
        let mut cursor = mods.walk();
        for child in mods.children(&mut cursor) {
            match child.kind() {
                "marker_annotation" | "annotation" => {
                    if let Some(a) = extract_annotation(&child, source) {
                        annotations.push(a);
                    }
                }
                _ => modifiers.push(node_text(&child, source).to_lowercase()),
            }
        }
    }

    (modifiers, annotations)
}

fn extract_annotation(node: &Node, source: &str) -> Option<AnnotationInfo> {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source))?;
    let mut annotation = AnnotationInfo {
        name,
        ..Default::default()
    };

    if let Some(args) = node.child_by_field_name("arguments") {
        let mut cursor = args.walk();
        for arg in args.named_children(&mut cursor) {
            if arg.kind() == "element_value_pair" {
                let key = arg
                    .child_by_field_name("key")
                    .map(|k| node_text(&k, source))
                    .unwrap_or_default();
                let value = arg
                    .child_by_field_name("value")
                    .map(|v| node_text(&v, source))
                    .unwrap_or_default();
                if !key.is_empty() {
                    annotation.attributes.insert(key, value);
                }
            } else {
                // Unnamed single value maps to the "value" key
                annotation
                    .attributes
                    .insert("value".to_string(), node_text(&arg, source));
            }
        }
    }

    Some(annotation)
}

fn extract_fields(body: &Node, source: &str) -> Vec<FieldInfo> {
    let mut fields = Vec::new();
    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        if member.kind() != "field_declaration" {
            continue;
        }
        let field_type = member
            .child_by_field_name("type")
            .map(|t| node_text(&t, source))
            .unwrap_or_default();
        let (modifiers, annotations) = extract_modifiers(&member, source);
        let documentation = preceding_doc_comment(&member, source).map(|c| parse_javadoc(&c));

        // One declaration can introduce several variables
        let mut decl_cursor = member.walk();
        for declarator in member
            .children(&mut decl_cursor)
            .filter(|c| c.kind() == "variable_declarator")
        {
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            fields.push(FieldInfo {
                name: node_text(&name_node, source),
                field_type: field_type.clone(),
                modifiers: modifiers.clone(),
                annotations: annotations.clone(),
                documentation: documentation.clone(),
                initializer: declarator
                    .child_by_field_name("value")
                    .map(|v| node_text(&v, source)),
                ..Default::default()
            });
        }
    }
    fields
}

fn extract_methods(
    body: &Node,
    source: &str,
    field_names: &BTreeSet<String>,
    resolver: &JavaCallResolver,
    dependencies: &mut Vec<String>,
) -> Vec<MethodInfo> {
    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        if member.kind() != "method_declaration" {
            continue;
        }

        let name = member
            .child_by_field_name("name")
            .map(|n| node_text(&n, source))
            .unwrap_or_default();
        let return_type = member
            .child_by_field_name("type")
            .map(|t| node_text(&t, source))
            .unwrap_or_else(|| Lang::Java.unit_type().to_string());
        let (modifiers, annotations) = extract_modifiers(&member, source);

        let parameters = member
            .child_by_field_name("parameters")
            .map(|p| extract_parameters(&p, source))
            .unwrap_or_default();

        let type_parameters = member
            .child_by_field_name("type_parameters")
            .map(|tp| {
                let mut tp_cursor = tp.walk();
                tp.named_children(&mut tp_cursor)
                    .map(|t| node_text(&t, source))
                    .collect()
            })
            .unwrap_or_default();

        let throws = child_of_kind(&member, &["throws"])
            .map(|t| {
                let mut t_cursor = t.walk();
                t.named_children(&mut t_cursor)
                    .map(|ty| node_text(&ty, source))
                    .collect()
            })
            .unwrap_or_default();

        let usage = member
            .child_by_field_name("body")
            .map(|b| analyze_java_body(&b, source, field_names, resolver))
            .unwrap_or_default();
        dependencies.extend(usage.resolved_owners.iter().cloned());

        for param in &parameters {
            if is_qualified(&param.param_type) {
                dependencies.push(type_erasure(&param.param_type).to_string());
            }
        }
        if is_qualified(&return_type) {
            dependencies.push(type_erasure(&return_type).to_string());
        }

        methods.push(MethodInfo {
            name,
            return_type,
            parameters,
            modifiers,
            type_parameters,
            annotations,
            documentation: preceding_doc_comment(&member, source).map(|c| parse_javadoc(&c)),
            accesses_fields: usage.accessed_fields,
            local_variables: usage.local_variables,
            method_invocations: usage.invocations,
            throws,
            ..Default::default()
        });
    }
    methods
}

fn extract_parameters(params: &Node, source: &str) -> Vec<ParameterInfo> {
    let mut parameters = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "formal_parameter" => {
                let (_, annotations) = extract_modifiers(&param, source);
                parameters.push(ParameterInfo {
                    name: param
                        .child_by_field_name("name")
                        .map(|n| node_text(&n, source))
                        .unwrap_or_default(),
                    param_type: param
                        .child_by_field_name("type")
                        .map(|t| node_text(&t, source))
                        .unwrap_or_default(),
                    annotations,
                    ..Default::default()
                });
            }
            "spread_parameter" => {
                // `Type... name`: the declarator holds the name
                let name = child_of_kind(&param, &["variable_declarator"])
                    .and_then(|d| d.child_by_field_name("name"))
                    .map(|n| node_text(&n, source))
                    .unwrap_or_default();
                let param_type = param
                    .named_child(0)
                    .map(|t| node_text(&t, source))
                    .unwrap_or_default();
                parameters.push(ParameterInfo {
                    name,
                    param_type,
                    is_vararg: true,
                    ..Default::default()
                });
            }
            _ => {}
        }
    }
    parameters
}

/// Syntactic call resolution from the compilation unit alone: explicit
/// imports give qualified names for simple types; member declarations
/// give types for scope identifiers; unscoped calls resolve to the class
/// itself when it declares a method of that name. A miss at any step is
/// a per-call resolution failure, never an error.
struct JavaCallResolver {
    class_fqn: String,
    imports: HashMap<String, String>,
    member_types: HashMap<String, String>,
    own_methods: HashSet<String>,
}

impl JavaCallResolver {
    fn build(
        class_node: &Node,
        source: &str,
        class_name: &str,
        package_name: &str,
        imports: &HashMap<String, String>,
        fields: &[FieldInfo],
    ) -> Self {
        let class_fqn = if package_name.is_empty() {
            class_name.to_string()
        } else {
            format!("{package_name}.{class_name}")
        };

        let member_types = fields
            .iter()
            .map(|f| (f.name.clone(), type_erasure(&f.field_type).to_string()))
            .collect();

        let mut own_methods = HashSet::new();
        if let Some(body) = class_node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.children(&mut cursor) {
                if member.kind() == "method_declaration" {
                    if let Some(name) = member.child_by_field_name("name") {
                        own_methods.insert(node_text(&name, source));
                    }
                }
            }
        }

        Self {
            class_fqn,
            imports: imports.clone(),
            member_types,
            own_methods,
        }
    }
}

impl CallResolver for JavaCallResolver {
    fn resolve(&self, scope: Option<&str>, method: &str) -> Option<String> {
        match scope {
            None | Some("this") => {
                if self.own_methods.contains(method) && is_qualified(&self.class_fqn) {
                    Some(self.class_fqn.clone())
                } else {
                    None
                }
            }
            Some(scope) => {
                // A field or a statically imported type
                if let Some(member_type) = self.member_types.get(scope) {
                    return self.imports.get(member_type).cloned();
                }
                self.imports.get(scope).cloned()
            }
        }
    }
}
