//! Dialect dispatch
//!
//! Single entry point that routes a source string to the extractor for
//! its language.

use tracing::debug;

use crate::error::Result;
use crate::extractors::java::JavaExtractor;
use crate::extractors::kotlin::KotlinExtractor;
use crate::extractors::StructureExtractor;
use crate::lang::Lang;
use crate::schema::ClassInfo;

/// Extract the primary type declaration from `source`.
///
/// Returns `Ok(None)` when the source parses to nothing usable; see
/// [`StructureExtractor::parse`] for the exact contract.
pub fn parse_source(source: &str, lang: Lang) -> Result<Option<ClassInfo>> {
    debug!(lang = lang.name(), bytes = source.len(), "extracting structure");
    match lang {
        Lang::Java => JavaExtractor::new().parse(source),
        Lang::Kotlin => KotlinExtractor::new().parse(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_java() {
        let info = parse_source("public class A {}", Lang::Java).unwrap().unwrap();
        assert_eq!(info.name, "A");
    }

    #[test]
    fn dispatches_kotlin() {
        let info = parse_source("class B", Lang::Kotlin).unwrap().unwrap();
        assert_eq!(info.name, "B");
    }

    #[test]
    fn garbage_is_none_not_error() {
        assert!(parse_source("not a class at all", Lang::Java).unwrap().is_none());
        assert!(parse_source("not a class at all", Lang::Kotlin).unwrap().is_none());
    }
}
