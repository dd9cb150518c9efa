//! Text extraction backends.
//!
//! Extraction is an external concern: a backend turns one PDF into UTF-8
//! text with pages separated by [`PAGE_BREAK`](crate::document::PAGE_BREAK).
//! Any failure is fatal for that document.

use crate::document::PAGE_BREAK;
use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Converts a PDF into page-delimited text.
pub trait TextExtractor: Send + Sync {
    /// Extracts the text of `input`, pages separated by `\f`.
    fn extract(&self, input: &Path) -> ModelResult<String>;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &str;
}

/// Available extraction backends, as selected in configuration or on the
/// command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractorKind {
    /// In-process extraction with `pdf-extract`
    PdfExtract,
    /// The `pdftotext -layout` utility; its column-preserving output is what
    /// the redaction tables are tuned for
    #[default]
    Pdftotext,
}

/// In-process extraction using the `pdf-extract` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractBackend;

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfExtractBackend {
    fn extract(&self, input: &Path) -> ModelResult<String> {
        let bytes = std::fs::read(input).map_err(|e| ModelError::Io {
            path: input.to_path_buf(),
            source: e,
        })?;

        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
            ModelError::TextExtraction {
                path: input.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        // The page marker is the only page delimiter downstream
        let pages: Vec<String> = pages
            .into_iter()
            .map(|page| page.replace(PAGE_BREAK, "\n"))
            .collect();
        Ok(pages.join(&PAGE_BREAK.to_string()))
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

/// Extraction through the poppler `pdftotext` utility in layout mode.
#[derive(Debug, Clone)]
pub struct PdftotextBackend {
    binary: PathBuf,
}

impl PdftotextBackend {
    /// Uses `pdftotext` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("pdftotext"),
        }
    }

    /// Uses a specific `pdftotext` executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }
}

impl Default for PdftotextBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdftotextBackend {
    fn extract(&self, input: &Path) -> ModelResult<String> {
        let output = Command::new(&self.binary)
            .arg("-layout")
            .arg(input)
            .arg("-")
            .output()
            .map_err(|e| ModelError::TextExtraction {
                path: input.to_path_buf(),
                reason: format!("failed to run '{}': {}", self.binary.display(), e),
            })?;

        if !output.status.success() {
            return Err(ModelError::TextExtraction {
                path: input.to_path_buf(),
                reason: format!(
                    "'{}' exited with {}: {}",
                    self.binary.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &str {
        "pdftotext"
    }
}

/// Builds the backend for `kind`.
pub fn extractor_for(kind: ExtractorKind, pdftotext_binary: &Path) -> Box<dyn TextExtractor> {
    match kind {
        ExtractorKind::PdfExtract => Box::new(PdfExtractBackend::new()),
        ExtractorKind::Pdftotext => {
            Box::new(PdftotextBackend::new().with_binary(pdftotext_binary))
        }
    }
}
