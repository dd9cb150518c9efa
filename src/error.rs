//! Error types for the typed-model generator.
//!
//! The redaction engine itself never fails on input text; errors come from
//! the edges of the pipeline (extraction, configuration, rendering, I/O).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generator operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Error type for all generator operations.
///
/// Variants are grouped by the pipeline edge they come from so callers
/// driving a batch can decide how to report each document.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Error occurred while reading or writing files
    #[error("IO error for path '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// The text extractor could not produce text for a source PDF
    #[error("Text extraction failed for '{}': {reason}", path.display())]
    TextExtraction { path: PathBuf, reason: String },

    /// Painting or encoding the output document failed
    #[error("{}", rendering_message(message, page))]
    Rendering { message: String, page: Option<usize> },

    /// A rule pattern could not be compiled
    #[error("Pattern error for '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    /// Configuration file unreadable or invalid
    #[error("Configuration error in '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// Invalid parameters (layout geometry, rule ordering, ...)
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },
}

fn rendering_message(message: &str, page: &Option<usize>) -> String {
    match page {
        Some(p) => format!("Rendering error on output page {}: {}", p, message),
        None => format!("Rendering error: {}", message),
    }
}

impl ModelError {
    /// Builds a [`ModelError::Pattern`] from a regex compilation failure.
    pub fn pattern(pattern: &str, err: regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    }

    /// Builds a [`ModelError::Rendering`].
    pub fn rendering(message: impl Into<String>, page: Option<usize>) -> Self {
        Self::Rendering {
            message: message.into(),
            page,
        }
    }
}

impl From<regex::Error> for ModelError {
    fn from(err: regex::Error) -> Self {
        Self::Pattern {
            pattern: "<unknown>".to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::Pattern {
            pattern: "[a-".to_string(),
            reason: "unclosed class".to_string(),
        };
        assert_eq!(err.to_string(), "Pattern error for '[a-': unclosed class");
    }

    #[test]
    fn test_rendering_display_with_and_without_page() {
        let err = ModelError::rendering("font missing", Some(3));
        assert_eq!(
            err.to_string(),
            "Rendering error on output page 3: font missing"
        );

        let err = ModelError::rendering("save failed", None);
        assert_eq!(err.to_string(), "Rendering error: save failed");
    }
}
