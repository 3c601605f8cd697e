//! Kotlin source extraction
//!
//! Walks a `tree-sitter-kotlin-ng` syntax tree and populates the
//! structural model, covering the richer declaration forms of this
//! language: data/sealed/inner classes, companion and singleton objects,
//! extension/infix/operator/suspend functions, property delegates and
//! custom accessors. Nested class-like declarations are extracted by
//! re-invoking the extractor on their own source text.
//!
//! Each `parse` call configures a fresh parser for the Kotlin grammar
//! and drops it on every exit path; the instance itself carries no
//! state between calls.

use std::collections::BTreeSet;

use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::analysis::{analyze_kotlin_body, finish_dependencies};
use crate::docs::parse_kdoc;
use crate::error::{DockitError, Result};
use crate::extractors::common::{
    child_of_kind, children_of_kind, is_qualified, node_text, parse_annotation_text,
    preceding_doc_comment, type_erasure,
};
use crate::extractors::StructureExtractor;
use crate::lang::Lang;
use crate::schema::{
    AnnotationInfo, ClassInfo, CompanionObjectInfo, FieldInfo, MethodInfo, ObjectInfo,
    ParameterInfo, PropertyDelegateInfo,
};

const CLASS_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
];
const NAME_KINDS: &[&str] = &["identifier", "simple_identifier", "type_identifier"];
const TYPE_KINDS: &[&str] = &[
    "user_type",
    "nullable_type",
    "function_type",
    "type_reference",
    "type",
];

/// Extractor for Kotlin-like sources
#[derive(Debug, Default)]
pub struct KotlinExtractor;

impl KotlinExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_class(&self, root: &Node, class_node: &Node, source: &str) -> Result<ClassInfo> {
        let name = child_of_kind(class_node, NAME_KINDS)
            .map(|n| node_text(&n, source))
            .unwrap_or_default();

        let (modifiers, annotations) = extract_modifiers(class_node, source);
        let is_data = modifiers.iter().any(|m| m == "data");
        let is_sealed = modifiers.iter().any(|m| m == "sealed");
        let is_inner = modifiers.iter().any(|m| m == "inner");

        let type_parameters = child_of_kind(class_node, &["type_parameters"])
            .map(|tp| {
                children_of_kind(&tp, &["type_parameter"])
                    .iter()
                    .map(|t| node_text(t, source))
                    .collect()
            })
            .unwrap_or_default();

        let (super_class, interfaces) = extract_supertypes(class_node, source);

        let kdoc = preceding_doc_comment(class_node, source).map(|c| parse_kdoc(&c));

        let package_name = extract_package(root, source);
        let imports = extract_imports(root, source);

        // Primary-constructor val/var parameters are properties
        let mut fields = extract_constructor_properties(class_node, source);

        let body = child_of_kind(class_node, &["class_body", "enum_class_body"]);

        if let Some(body) = &body {
            for property in children_of_kind(body, &["property_declaration"]) {
                fields.push(extract_property(&property, source));
            }
        }

        let field_names: BTreeSet<String> = fields.iter().map(|f| f.name.clone()).collect();

        let mut methods = Vec::new();
        let mut nested_classes = Vec::new();
        let mut companion_object = None;
        let mut objects = Vec::new();

        if let Some(body) = &body {
            let mut cursor = body.walk();
            for member in body.children(&mut cursor) {
                match member.kind() {
                    "function_declaration" => {
                        methods.push(extract_function(&member, source, &field_names));
                    }
                    "companion_object" => {
                        if companion_object.is_none() {
                            companion_object = Some(extract_companion(&member, source));
                        }
                    }
                    "object_declaration" => {
                        if let Some(object) = extract_object(&member, source) {
                            objects.push(object);
                        }
                    }
                    kind if CLASS_KINDS.contains(&kind) => {
                        // Re-enter the extractor on the nested declaration's
                        // own source text
                        if let Some(nested) = self.parse(&node_text(&member, source))? {
                            nested_classes.push(nested);
                        }
                    }
                    _ => {}
                }
            }
        }

        let mut dependencies: Vec<String> = imports;
        for field in &fields {
            if is_qualified(&field.field_type) {
                dependencies.push(type_erasure(&field.field_type).to_string());
            }
        }
        for method in &methods {
            if is_qualified(&method.return_type) {
                dependencies.push(type_erasure(&method.return_type).to_string());
            }
            for param in &method.parameters {
                if is_qualified(&param.param_type) {
                    dependencies.push(type_erasure(&param.param_type).to_string());
                }
            }
        }
        for annotation in &annotations {
            if is_qualified(&annotation.name) {
                dependencies.push(annotation.name.clone());
            }
        }

        Ok(ClassInfo {
            name,
            package_name,
            methods,
            fields,
            dependencies: finish_dependencies(dependencies),
            super_class,
            interfaces,
            type_parameters,
            annotations,
            documentation: kdoc.as_ref().map(|d| d.base.clone()),
            kotlin_documentation: kdoc,
            nested_classes,
            companion_object,
            objects,
            is_data,
            is_sealed,
            is_inner,
        })
    }
}

impl StructureExtractor for KotlinExtractor {
    fn parse(&self, source: &str) -> Result<Option<ClassInfo>> {
        // Scoped parsing environment, released on every exit path
        let mut parser = Parser::new();
        parser
            .set_language(&Lang::Kotlin.tree_sitter_language())
            .map_err(|e| DockitError::Environment {
                dialect: Lang::Kotlin.name(),
                message: e.to_string(),
            })?;

        let Some(tree) = parser.parse(source, None) else {
            return Ok(None);
        };
        let root = tree.root_node();

        let Some(class_node) = child_of_kind(&root, CLASS_KINDS) else {
            debug!("no primary type declaration found in kotlin source");
            return Ok(None);
        };

        self.extract_class(&root, &class_node, source).map(Some)
    }
}

fn extract_package(root: &Node, source: &str) -> String {
    child_of_kind(root, &["package_header"])
        .and_then(|header| child_of_kind(&header, &["qualified_identifier", "identifier"]))
        .map(|n| node_text(&n, source))
        .unwrap_or_default()
}

fn extract_imports(root: &Node, source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "import" | "import_header" => {
                if let Some(name) = child_of_kind(&child, &["qualified_identifier", "identifier"]) {
                    imports.push(node_text(&name, source));
                }
            }
            "import_list" => {
                for header in children_of_kind(&child, &["import_header", "import"]) {
                    if let Some(name) =
                        child_of_kind(&header, &["qualified_identifier", "identifier"])
                    {
                        imports.push(node_text(&name, source));
                    }
                }
            }
            _ => {}
        }
    }
    imports
}

/// Split a declaration's `modifiers` node into plain tokens and
/// annotations. Flags (`data`, `operator`, ...) are read back from the
/// token list by callers.
fn extract_modifiers(node: &Node, source: &str) -> (Vec<String>, Vec<AnnotationInfo>) {
    let mut tokens = Vec::new();
    let mut annotations = Vec::new();

    if let Some(mods) = child_of_kind(node, &["modifiers"]) {
        let mut cursor = mods.walk();
        for child in mods.children(&mut cursor) {
            if child.kind() == "annotation" {
                if let Some(a) = parse_annotation_text(&node_text(&child, source)) {
                    annotations.push(a);
                }
            } else {
                tokens.push(node_text(&child, source));
            }
        }
    }

    (tokens, annotations)
}

/// Raw annotation texts, for tags that need the unparsed argument list
fn raw_annotation_texts(node: &Node, source: &str) -> Vec<String> {
    child_of_kind(node, &["modifiers"])
        .map(|mods| {
            children_of_kind(&mods, &["annotation"])
                .iter()
                .map(|a| node_text(a, source))
                .collect()
        })
        .unwrap_or_default()
}

/// First constructor-invocation specifier is the superclass; plain
/// user-type specifiers are interfaces
fn extract_supertypes(class_node: &Node, source: &str) -> (Option<String>, Vec<String>) {
    let mut super_class = None;
    let mut interfaces = Vec::new();

    let mut specifiers = Vec::new();
    if let Some(container) = child_of_kind(class_node, &["delegation_specifiers"]) {
        specifiers.extend(children_of_kind(&container, &["delegation_specifier"]));
    }
    specifiers.extend(children_of_kind(class_node, &["delegation_specifier"]));

    for specifier in specifiers {
        if let Some(ctor) = child_of_kind(&specifier, &["constructor_invocation"]) {
            let text = node_text(&ctor, source);
            let name = text.split('(').next().unwrap_or(&text).trim().to_string();
            if super_class.is_none() {
                super_class = Some(name);
            } else {
                interfaces.push(name);
            }
        } else if let Some(delegated) = child_of_kind(&specifier, &["explicit_delegation"]) {
            // `Drawable by drawable` implements Drawable
            let text = node_text(&delegated, source);
            if let Some(ty) = text.split(" by ").next() {
                interfaces.push(ty.trim().to_string());
            }
        } else if let Some(ty) = child_of_kind(&specifier, TYPE_KINDS) {
            interfaces.push(node_text(&ty, source));
        } else {
            let text = node_text(&specifier, source);
            if !text.is_empty() {
                interfaces.push(text);
            }
        }
    }

    (super_class, interfaces)
}

/// `val`/`var` parameters of the primary constructor, surfaced as fields
fn extract_constructor_properties(class_node: &Node, source: &str) -> Vec<FieldInfo> {
    let Some(ctor) = child_of_kind(class_node, &["primary_constructor"]) else {
        return Vec::new();
    };
    let params = child_of_kind(&ctor, &["class_parameters"])
        .map(|p| children_of_kind(&p, &["class_parameter"]))
        .unwrap_or_else(|| children_of_kind(&ctor, &["class_parameter"]));

    let mut fields = Vec::new();
    for param in params {
        let Some(binding) = binding_keyword(&param, source) else {
            continue; // plain constructor parameter, not a property
        };
        let name = child_of_kind(&param, NAME_KINDS)
            .map(|n| node_text(&n, source))
            .unwrap_or_default();
        let field_type = child_of_kind(&param, TYPE_KINDS)
            .map(|t| node_text(&t, source))
            .unwrap_or_default();
        let (mut modifiers, annotations) = extract_modifiers(&param, source);
        modifiers.push(binding);

        fields.push(FieldInfo {
            name,
            field_type,
            modifiers,
            annotations,
            initializer: initializer_text(&param, source),
            ..Default::default()
        });
    }
    fields
}

/// The `val`/`var` keyword of a property-like declaration, either a
/// direct child or wrapped in a binding_pattern_kind node
fn binding_keyword(node: &Node, source: &str) -> Option<String> {
    if let Some(direct) = child_of_kind(node, &["val", "var"]) {
        return Some(node_text(&direct, source));
    }
    child_of_kind(node, &["binding_pattern_kind"])
        .and_then(|b| child_of_kind(&b, &["val", "var"]))
        .map(|n| node_text(&n, source))
}

/// Expression text following the `=` token, if any
fn initializer_text(node: &Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    let idx = children
        .iter()
        .position(|c| !c.is_named() && node_text(c, source) == "=")?;
    children
        .get(idx + 1)
        .map(|n| node_text(n, source).trim().to_string())
}

fn extract_property(node: &Node, source: &str) -> FieldInfo {
    let var_decl = child_of_kind(node, &["variable_declaration"]);

    let name = var_decl
        .as_ref()
        .and_then(|vd| child_of_kind(vd, NAME_KINDS))
        .or_else(|| child_of_kind(node, NAME_KINDS))
        .map(|n| node_text(&n, source))
        .unwrap_or_default();

    let declared_type = var_decl
        .as_ref()
        .and_then(|vd| child_of_kind(vd, TYPE_KINDS))
        .or_else(|| child_of_kind(node, TYPE_KINDS))
        .map(|t| node_text(&t, source));

    let (mut modifiers, annotations) = extract_modifiers(node, source);
    let is_lateinit = modifiers.iter().any(|m| m == "lateinit");
    let binding = binding_keyword(node, source).unwrap_or_else(|| "val".to_string());
    modifiers.push(binding);

    let initializer = initializer_text(node, source);

    // Untyped properties fall back to literal-shape inference. This is a
    // syntactic heuristic, not type inference: a constant initialized
    // from a function call will be misclassified as Int.
    let field_type = match declared_type {
        Some(t) => t,
        None => initializer
            .as_deref()
            .map(infer_literal_type)
            .unwrap_or_default(),
    };

    let delegate = child_of_kind(node, &["property_delegate"]).map(|d| {
        let expression = node_text(&d, source)
            .trim_start_matches("by")
            .trim()
            .to_string();
        classify_delegate(&expression)
    });

    let (getter, setter) = find_accessors(node);
    let has_custom_getter = getter
        .as_ref()
        .is_some_and(|g| is_custom_accessor(g, source));
    let has_custom_setter = setter
        .as_ref()
        .is_some_and(|s| is_custom_accessor(s, source));
    let getter_visibility = getter.as_ref().and_then(|g| accessor_visibility(g, source));
    let setter_visibility = setter.as_ref().and_then(|s| accessor_visibility(s, source));

    let kdoc = preceding_doc_comment(node, source).map(|c| parse_kdoc(&c));

    FieldInfo {
        name,
        field_type,
        modifiers,
        annotations,
        documentation: kdoc.as_ref().map(|d| d.base.clone()),
        initializer,
        kotlin_documentation: kdoc,
        has_custom_getter,
        has_custom_setter,
        getter_visibility,
        setter_visibility,
        is_lateinit,
        delegate,
    }
}

/// Accessors are children of the property in current grammars but were
/// siblings in older ones; look in both places.
fn find_accessors<'a>(property: &Node<'a>) -> (Option<Node<'a>>, Option<Node<'a>>) {
    let mut getter = child_of_kind(property, &["getter"]);
    let mut setter = child_of_kind(property, &["setter"]);

    let mut sibling = property.next_sibling();
    while let Some(node) = sibling {
        match node.kind() {
            "getter" => {
                getter.get_or_insert(node);
                sibling = node.next_sibling();
            }
            "setter" => {
                setter.get_or_insert(node);
                sibling = node.next_sibling();
            }
            _ => break,
        }
    }

    (getter, setter)
}

/// An accessor is custom when it carries a body. A bare `get` or
/// `private set` only adjusts visibility.
fn is_custom_accessor(accessor: &Node, source: &str) -> bool {
    if child_of_kind(accessor, &["function_body"]).is_some() {
        return true;
    }
    let text = node_text(accessor, source);
    text.contains('{') || text.contains('=')
}

/// Visibility from the accessor's own modifier list, unset when absent
fn accessor_visibility(accessor: &Node, source: &str) -> Option<String> {
    let (tokens, _) = extract_modifiers(accessor, source);
    tokens
        .into_iter()
        .find(|t| matches!(t.as_str(), "public" | "private" | "protected" | "internal"))
}

/// Literal-shape inference for untyped constants, in fixed priority
/// order: quoted string, 64-bit suffix, decimal point, default integer.
fn infer_literal_type(initializer: &str) -> String {
    let init = initializer.trim();
    if init.starts_with('"') {
        "String".to_string()
    } else if init.ends_with('L') {
        "Long".to_string()
    } else if init.contains('.') {
        "Double".to_string()
    } else {
        "Int".to_string()
    }
}

/// Delegate kind from the leading tokens of the delegate expression
fn classify_delegate(expression: &str) -> PropertyDelegateInfo {
    let expr = expression.trim();
    let kind = if expr == "lazy"
        || expr.starts_with("lazy(")
        || expr.starts_with("lazy{")
        || expr.starts_with("lazy ")
    {
        "lazy".to_string()
    } else if let Some(rest) = expr.strip_prefix("Delegates.") {
        rest.split(['(', '{', ' '])
            .next()
            .unwrap_or(rest)
            .to_string()
    } else {
        expr.split(['(', '{', ' ', '<'])
            .next()
            .unwrap_or(expr)
            .trim()
            .to_string()
    };

    PropertyDelegateInfo {
        kind,
        expression: expr.to_string(),
    }
}

fn extract_function(node: &Node, source: &str, field_names: &BTreeSet<String>) -> MethodInfo {
    let name = child_of_kind(node, NAME_KINDS)
        .map(|n| node_text(&n, source))
        .unwrap_or_default();

    let (modifiers, annotations) = extract_modifiers(node, source);
    let is_operator = modifiers.iter().any(|m| m == "operator");
    let is_infix = modifiers.iter().any(|m| m == "infix");
    let is_inline = modifiers.iter().any(|m| m == "inline");
    let is_suspend = modifiers.iter().any(|m| m == "suspend");

    let type_parameters = child_of_kind(node, &["type_parameters"])
        .map(|tp| {
            children_of_kind(&tp, &["type_parameter"])
                .iter()
                .map(|t| node_text(t, source))
                .collect()
        })
        .unwrap_or_default();

    let receiver_type = extract_receiver(node, source);
    let parameters = child_of_kind(node, &["function_value_parameters"])
        .map(|p| extract_parameters(&p, source))
        .unwrap_or_default();
    let return_type =
        extract_return_type(node, source).unwrap_or_else(|| Lang::Kotlin.unit_type().to_string());

    let throws = raw_annotation_texts(node, source)
        .iter()
        .flat_map(|text| throws_from_annotation(text))
        .collect();

    let usage = child_of_kind(node, &["function_body"])
        .map(|body| analyze_kotlin_body(&body, source, field_names))
        .unwrap_or_default();

    let kdoc = preceding_doc_comment(node, source).map(|c| parse_kdoc(&c));

    MethodInfo {
        name,
        return_type,
        parameters,
        modifiers,
        type_parameters,
        annotations,
        documentation: kdoc.as_ref().map(|d| d.base.clone()),
        accesses_fields: usage.accessed_fields,
        local_variables: usage.local_variables,
        method_invocations: usage.invocations,
        throws,
        kotlin_documentation: kdoc,
        receiver_type,
        is_operator,
        is_infix,
        is_inline,
        is_suspend,
    }
}

/// Extension-function receiver: a type node directly followed by `.`
/// before the function name
fn extract_receiver(node: &Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    for pair in children.windows(2) {
        if TYPE_KINDS.contains(&pair[0].kind())
            && !pair[1].is_named()
            && node_text(&pair[1], source) == "."
        {
            return Some(node_text(&pair[0], source));
        }
    }
    None
}

/// Declared return type: the type node following the `:` after the
/// parameter list
fn extract_return_type(node: &Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    let params_idx = children
        .iter()
        .position(|c| c.kind() == "function_value_parameters")?;
    let mut seen_colon = false;
    for child in &children[params_idx + 1..] {
        if !child.is_named() && node_text(child, source) == ":" {
            seen_colon = true;
            continue;
        }
        if seen_colon
            && (TYPE_KINDS.contains(&child.kind()) || NAME_KINDS.contains(&child.kind()))
        {
            return Some(node_text(child, source));
        }
    }
    None
}

fn extract_parameters(params: &Node, source: &str) -> Vec<ParameterInfo> {
    let mut parameters: Vec<ParameterInfo> = Vec::new();
    let mut pending_vararg = false;

    let mut cursor = params.walk();
    for child in params.children(&mut cursor) {
        match child.kind() {
            "parameter" => {
                let (tokens, annotations) = extract_modifiers(&child, source);
                let is_vararg = pending_vararg
                    || tokens.iter().any(|t| t == "vararg")
                    || has_vararg_modifier(&child, source);
                pending_vararg = false;

                parameters.push(ParameterInfo {
                    name: child_of_kind(&child, NAME_KINDS)
                        .map(|n| node_text(&n, source))
                        .unwrap_or_default(),
                    param_type: child_of_kind(&child, TYPE_KINDS)
                        .map(|t| node_text(&t, source))
                        .unwrap_or_default(),
                    annotations,
                    has_default: initializer_text(&child, source).is_some(),
                    is_vararg,
                });
            }
            "parameter_modifiers" | "parameter_modifier" => {
                if node_text(&child, source).contains("vararg") {
                    pending_vararg = true;
                }
            }
            _ => {
                let text = node_text(&child, source);
                if text == "vararg" {
                    pending_vararg = true;
                } else if text == "=" {
                    // default value follows the parameter node
                    if let Some(last) = parameters.last_mut() {
                        last.has_default = true;
                    }
                }
            }
        }
    }
    parameters
}

fn has_vararg_modifier(param: &Node, source: &str) -> bool {
    child_of_kind(param, &["parameter_modifiers", "modifiers"])
        .map(|m| node_text(&m, source).contains("vararg"))
        .unwrap_or(false)
}

/// `@Throws(A::class, B::class)` declares thrown exception types
fn throws_from_annotation(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if !trimmed.starts_with("@Throws") {
        return Vec::new();
    }
    let Some(open) = trimmed.find('(') else {
        return Vec::new();
    };
    let inner = trimmed[open + 1..].trim_end_matches(')');
    inner
        .split(',')
        .filter_map(|part| part.trim().strip_suffix("::class"))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn extract_companion(node: &Node, source: &str) -> CompanionObjectInfo {
    let (fields, methods, annotations) = extract_object_members(node, source);
    CompanionObjectInfo {
        name: child_of_kind(node, NAME_KINDS).map(|n| node_text(&n, source)),
        fields,
        methods,
        annotations,
    }
}

fn extract_object(node: &Node, source: &str) -> Option<ObjectInfo> {
    let name = child_of_kind(node, NAME_KINDS).map(|n| node_text(&n, source))?;
    let (fields, methods, annotations) = extract_object_members(node, source);
    Some(ObjectInfo {
        name,
        fields,
        methods,
        annotations,
    })
}

fn extract_object_members(
    node: &Node,
    source: &str,
) -> (Vec<FieldInfo>, Vec<MethodInfo>, Vec<AnnotationInfo>) {
    let (_, annotations) = extract_modifiers(node, source);

    let mut fields = Vec::new();
    let mut methods = Vec::new();

    if let Some(body) = child_of_kind(node, &["class_body"]) {
        for property in children_of_kind(&body, &["property_declaration"]) {
            fields.push(extract_property(&property, source));
        }
        let field_names: BTreeSet<String> = fields.iter().map(|f| f.name.clone()).collect();
        for function in children_of_kind(&body, &["function_declaration"]) {
            methods.push(extract_function(&function, source, &field_names));
        }
    }

    (fields, methods, annotations)
}
