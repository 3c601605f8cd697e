//! Dialect detection and tree-sitter grammar loading

use std::path::Path;

use tree_sitter::Language;

use crate::error::{DockitError, Result};

/// Supported source dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Java,
    Kotlin,
}

impl Lang {
    /// Detect dialect from file path extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| DockitError::UnsupportedLanguage {
                extension: "none".to_string(),
            })?;

        Self::from_extension(ext)
    }

    /// Detect dialect from file extension string
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.to_lowercase();
        [Self::Java, Self::Kotlin]
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
            .ok_or(DockitError::UnsupportedLanguage { extension: ext })
    }

    /// Get the canonical name of the dialect
    pub fn name(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Kotlin => "kotlin",
        }
    }

    /// Get the tree-sitter Language for parsing
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            Self::Kotlin => tree_sitter_kotlin_ng::LANGUAGE.into(),
        }
    }

    /// Get common file extensions for this dialect
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Java => &["java"],
            Self::Kotlin => &["kt", "kts"],
        }
    }

    /// The dialect's implicit "no value" return type
    pub fn unit_type(&self) -> &'static str {
        match self {
            Self::Java => "void",
            Self::Kotlin => "Unit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_dialect_detection() {
        assert_eq!(Lang::from_extension("java").unwrap(), Lang::Java);
        assert_eq!(Lang::from_extension("kt").unwrap(), Lang::Kotlin);
        assert_eq!(Lang::from_extension("kts").unwrap(), Lang::Kotlin);
        assert_eq!(Lang::from_extension("KT").unwrap(), Lang::Kotlin);
    }

    #[test]
    fn test_dialect_from_path() {
        let path = PathBuf::from("src/main/java/com/example/Widget.java");
        assert_eq!(Lang::from_path(&path).unwrap(), Lang::Java);

        let path = PathBuf::from("Widget.kt");
        assert_eq!(Lang::from_path(&path).unwrap(), Lang::Kotlin);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(Lang::from_extension("scala").is_err());
        assert!(Lang::from_path(&PathBuf::from("README")).is_err());
    }

    #[test]
    fn test_unit_type() {
        assert_eq!(Lang::Java.unit_type(), "void");
        assert_eq!(Lang::Kotlin.unit_type(), "Unit");
    }
}
