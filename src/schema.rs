//! The structural model shared by both dialect extractors
//!
//! Every type here is a plain immutable value record, produced in full by
//! one extractor pass. Nothing holds a reference back into the syntax
//! tree, so a `ClassInfo` can be serialized, cached, or sent across
//! threads freely.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Root unit of extraction: one primary type declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Simple name of the type. Never empty for a successful parse.
    pub name: String,
    /// Package (namespace) path, empty when the file declares none
    pub package_name: String,
    /// Methods in declaration order
    pub methods: Vec<MethodInfo>,
    /// Fields in declaration order
    pub fields: Vec<FieldInfo>,
    /// Fully-qualified dependency names, ascending, deduplicated
    pub dependencies: Vec<String>,
    /// Extended superclass, if any
    pub super_class: Option<String>,
    /// Implemented interface names as written
    pub interfaces: Vec<String>,
    /// Type parameter descriptors as written (variance and bounds kept)
    pub type_parameters: Vec<String>,
    pub annotations: Vec<AnnotationInfo>,
    pub documentation: Option<DocumentationInfo>,
    // Kotlin-specific fields
    pub kotlin_documentation: Option<KotlinDocumentationInfo>,
    /// Nested class-like declarations, each a full ClassInfo
    pub nested_classes: Vec<ClassInfo>,
    /// At most one companion object (first found)
    pub companion_object: Option<CompanionObjectInfo>,
    /// Named singleton objects declared in the class body
    pub objects: Vec<ObjectInfo>,
    pub is_data: bool,
    pub is_sealed: bool,
    pub is_inner: bool,
}

/// One method or function declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    /// Declared return type, or the dialect's implicit "no value" type
    pub return_type: String,
    pub parameters: Vec<ParameterInfo>,
    /// Modifier tokens as written, lower-cased
    pub modifiers: Vec<String>,
    pub type_parameters: Vec<String>,
    pub annotations: Vec<AnnotationInfo>,
    pub documentation: Option<DocumentationInfo>,
    /// Names of declaring-class fields the body touches
    pub accesses_fields: BTreeSet<String>,
    /// Local variables that are declared and referenced at least once
    pub local_variables: BTreeSet<String>,
    /// Outgoing call targets, `Owner.method` when resolvable, first-seen order
    pub method_invocations: Vec<String>,
    /// Declared thrown exception type names
    pub throws: Vec<String>,
    // Kotlin-specific fields
    pub kotlin_documentation: Option<KotlinDocumentationInfo>,
    /// Receiver type for extension functions
    pub receiver_type: Option<String>,
    pub is_operator: bool,
    pub is_infix: bool,
    pub is_inline: bool,
    pub is_suspend: bool,
}

/// One field or property declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    /// Declared type, or the inferred type for untyped constants
    pub field_type: String,
    /// Native modifiers first, mutability marker (`val`/`var`) appended last
    pub modifiers: Vec<String>,
    pub annotations: Vec<AnnotationInfo>,
    pub documentation: Option<DocumentationInfo>,
    /// Literal initializer text, if present
    pub initializer: Option<String>,
    // Kotlin-specific fields
    pub kotlin_documentation: Option<KotlinDocumentationInfo>,
    pub has_custom_getter: bool,
    pub has_custom_setter: bool,
    pub getter_visibility: Option<String>,
    pub setter_visibility: Option<String>,
    pub is_lateinit: bool,
    pub delegate: Option<PropertyDelegateInfo>,
}

/// One method parameter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub param_type: String,
    pub annotations: Vec<AnnotationInfo>,
    pub has_default: bool,
    pub is_vararg: bool,
}

/// One annotation occurrence
///
/// An unnamed single-value annotation maps its value to the key `"value"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationInfo {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
}

/// Parsed structured documentation comment, shared tag vocabulary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentationInfo {
    /// Free-form text preceding the first tag line
    pub description: String,
    /// `@param name description`
    pub params: BTreeMap<String, String>,
    /// `@return`
    pub returns: Option<String>,
    /// `@throws ExceptionType description`
    pub throws: BTreeMap<String, String>,
    /// `@see`, in encounter order
    pub see: Vec<String>,
    /// `@since`
    pub since: Option<String>,
    /// `@deprecated`
    pub deprecated: Option<String>,
}

/// KDoc documentation: the shared vocabulary plus Kotlin-only tags
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KotlinDocumentationInfo {
    pub base: DocumentationInfo,
    /// `@property name description`
    pub property_docs: BTreeMap<String, String>,
    /// `@sample`, in encounter order
    pub samples: Vec<String>,
    /// `@constructor`
    pub constructor_doc: Option<String>,
    /// `@author`, in encounter order
    pub authors: Vec<String>,
}

/// A companion object; the name is absent for anonymous companions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanionObjectInfo {
    pub name: Option<String>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub annotations: Vec<AnnotationInfo>,
}

/// A named singleton object declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub name: String,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub annotations: Vec<AnnotationInfo>,
}

/// A delegated property: kind plus the raw delegate expression
///
/// `kind` is "lazy" for the lazy builder, the helper name for
/// `Delegates.*` helpers, otherwise the leading identifier of the
/// delegate expression.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyDelegateInfo {
    pub kind: String,
    pub expression: String,
}
