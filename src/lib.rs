//! dockit-core: structural extraction for Java and Kotlin sources
//!
//! Parses a single source file with tree-sitter and distills its primary
//! type declaration into a serializable [`ClassInfo`] model: methods,
//! fields, annotations, documentation, declared dependencies and
//! lightweight body usage facts. The model is dialect-unified, so
//! downstream consumers read Java and Kotlin results through one shape.
//!
//! Typical use:
//!
//! ```no_run
//! use dockit_core::{parse_source, Lang};
//!
//! let source = std::fs::read_to_string("Service.java")?;
//! if let Some(class) = parse_source(&source, Lang::Java)? {
//!     println!("{} has {} methods", class.name, class.methods.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod docs;
pub mod error;
pub mod extract;
pub mod extractors;
pub mod lang;
pub mod schema;

pub use error::{DockitError, Result};
pub use extract::parse_source;
pub use lang::Lang;
pub use schema::{
    AnnotationInfo, ClassInfo, CompanionObjectInfo, DocumentationInfo, FieldInfo,
    KotlinDocumentationInfo, MethodInfo, ObjectInfo, ParameterInfo, PropertyDelegateInfo,
};
