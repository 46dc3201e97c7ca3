//! Error types with fix suggestions
//!
//! Resolution itself never fails. These errors only come from the
//! fallible edges: loading sample data, configuration, strict path
//! parsing and terminal IO.
//!
//! Error code ranges:
//! - BIND-000-009: IO / parse errors
//! - BIND-010-019: Sample data errors
//! - BIND-020-029: Path errors
//! - BIND-030-039: Configuration errors
//! - BIND-040-049: Terminal editor errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BinderyError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum BinderyError {
    #[error("[BIND-001] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[BIND-002] JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("[BIND-003] YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ─────────────────────────────────────────────────────────────
    // Sample data (010-019)
    // ─────────────────────────────────────────────────────────────
    #[error("[BIND-010] Sample data file not found: {path}")]
    SampleDataNotFound { path: String },

    #[error("[BIND-011] Cannot parse sample data '{path}': {details}")]
    SampleDataParse { path: String, details: String },

    #[error("[BIND-012] Unsupported sample data format '{extension}' for '{path}'")]
    UnsupportedFormat { path: String, extension: String },

    // ─────────────────────────────────────────────────────────────
    // Paths (020-029)
    // ─────────────────────────────────────────────────────────────
    #[error("[BIND-020] Invalid path syntax: '{path}'")]
    InvalidPath { path: String },

    #[error("[BIND-021] Path '{path}' not found in sample data")]
    PathNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration (030-039)
    // ─────────────────────────────────────────────────────────────
    #[error("[BIND-030] Configuration error: {reason}")]
    ConfigError { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Terminal editor (040-049)
    // ─────────────────────────────────────────────────────────────
    #[error("[BIND-040] Terminal error: {reason}")]
    Terminal { reason: String },
}

impl FixSuggestion for BinderyError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            BinderyError::Io(_) => Some("Check file path and permissions"),
            BinderyError::Json(_) => Some("Check JSON syntax (try parsing with jq)"),
            BinderyError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            BinderyError::SampleDataNotFound { .. } => Some("Pass an existing file to --data"),
            BinderyError::SampleDataParse { .. } => {
                Some("Sample data must be a single JSON or YAML document")
            }
            BinderyError::UnsupportedFormat { .. } => {
                Some("Use a .json, .yaml or .yml sample data file")
            }
            BinderyError::InvalidPath { .. } => {
                Some("Use dotted paths like customer.name or items.0.price")
            }
            BinderyError::PathNotFound { .. } => {
                Some("Run `bindery tree --data <file>` to list available paths")
            }
            BinderyError::ConfigError { .. } => Some("Check bindery.yaml field names and types"),
            BinderyError::Terminal { .. } => Some("Run the editor in an interactive terminal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_in_messages() {
        let err = BinderyError::InvalidPath {
            path: "a..b".to_string(),
        };
        assert!(err.to_string().contains("BIND-020"));
        assert!(err.to_string().contains("a..b"));
    }

    #[test]
    fn test_every_variant_has_suggestion() {
        let errors = vec![
            BinderyError::SampleDataNotFound { path: "x".into() },
            BinderyError::PathNotFound { path: "x".into() },
            BinderyError::ConfigError { reason: "x".into() },
            BinderyError::Terminal { reason: "x".into() },
        ];
        for err in errors {
            assert!(err.fix_suggestion().is_some(), "no fix for {err}");
        }
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: BinderyError = io.into();
        assert!(matches!(err, BinderyError::Io(_)));
    }
}
