//! Per-dialect structural extractors
//!
//! Each extractor owns one tree-sitter grammar and knows how to walk its
//! shapes into the shared [`ClassInfo`](crate::schema::ClassInfo) model.
//! Callers go through [`crate::extract::parse_source`], which picks the
//! extractor for a [`Lang`](crate::lang::Lang).

pub mod common;
pub mod java;
pub mod kotlin;

use crate::error::Result;
use crate::schema::ClassInfo;

/// Contract shared by the dialect extractors.
///
/// `Ok(None)` means the source held no extractable primary type, whether
/// because it failed to parse or because no class-like declaration was
/// present; the two cases are deliberately indistinguishable. Errors are
/// reserved for failures to stand up the parsing environment itself.
pub trait StructureExtractor {
    fn parse(&self, source: &str) -> Result<Option<ClassInfo>>;
}
