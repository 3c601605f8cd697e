//! Error types for dockit-core

use std::process::ExitCode;

use thiserror::Error;

/// Result type alias using DockitError
pub type Result<T> = std::result::Result<T, DockitError>;

/// Errors that can occur during structural extraction
///
/// "No primary declaration found" is deliberately *not* an error: the
/// extractors return `Ok(None)` for it, and callers must not distinguish
/// syntax errors from "no class present".
#[derive(Debug, Error)]
pub enum DockitError {
    /// File extension does not map to a supported dialect
    #[error("Unsupported file extension: {extension}")]
    UnsupportedLanguage { extension: String },

    /// Input file does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// The dialect's parsing environment could not be created.
    /// Fatal to the call: no syntax tree exists yet, so no partial
    /// result is possible.
    #[error("Failed to initialize {dialect} parser: {message}")]
    Environment {
        dialect: &'static str,
        message: String,
    },

    /// I/O failure reading input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DockitError {
    /// Map errors to CLI exit codes
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::UnsupportedLanguage { .. } => ExitCode::from(2),
            Self::FileNotFound { .. } => ExitCode::from(3),
            Self::Environment { .. } => ExitCode::from(4),
            Self::Io(_) => ExitCode::from(5),
        }
    }
}
