//! Anonymized "typed model" court documents from real source PDFs.
//!
//! The generator extracts page text from a source PDF, rewrites every line
//! through an ordered chain of redaction rules that strip personal data
//! (names, CPF/CNPJ, process numbers, dates, emails, places) while keeping
//! the document's shape, then paints the sanitized lines onto fresh A4
//! pages.
//!
//! # Architecture
//!
//! - [`domain`]: the redaction rules of each stage
//! - [`redaction`]: the ordered [`RuleSet`], text extractors and the
//!   [`ModelGenerator`] service
//! - [`render`]: the paginator and its page sinks
//! - [`document`]: page-structured text
//! - [`config`]: TOML configuration
//! - [`error`]: error handling
//!
//! # Quick Start
//!
//! ```no_run
//! use typed_model::ModelGenerator;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = ModelGenerator::with_defaults()?;
//!
//! generator.generate(
//!     Path::new("despacho.backup.pdf"),
//!     Path::new("despacho.pdf"),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Sanitizing a line
//!
//! ```
//! use typed_model::RuleSet;
//!
//! let rules = RuleSet::standard().unwrap();
//! assert_eq!(
//!     rules.sanitize_line("CPF: 123.456.789-01, email joao@example.com"),
//!     "CPF: 000.000.000-00, email ppppp@ppppp.ppp"
//! );
//! ```

pub mod config;
pub mod document;
pub mod domain;
pub mod error;
pub mod redaction;
pub mod render;

pub use config::{Config, LayoutConfig, RulesConfig};
pub use document::{Document, Page, SanitizedDocument, SanitizedPage, PAGE_BREAK};
pub use domain::{RedactionRule, Replacement, Stage};
pub use error::{ModelError, ModelResult};
pub use redaction::{
    BatchOutcome, ExtractorKind, GenerationReport, ModelGenerator, PdfExtractBackend,
    PdftotextBackend, RenderOptions, RuleSet, TextExtractor,
};
pub use render::{render, BlankLines, LayoutRecorder, PageGeometry, PageSink, PdfSink, RenderStats};
