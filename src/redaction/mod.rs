//! Generation service: extraction, redaction and rendering of one document.
//!
//! The service owns a text extractor, a compiled [`RuleSet`] and the render
//! options. Each document is processed independently; batch runs fan out
//! over documents and report every outcome separately.

pub mod extract;
pub mod ruleset;

pub use extract::{
    extractor_for, ExtractorKind, PdfExtractBackend, PdftotextBackend, TextExtractor,
};
pub use ruleset::RuleSet;

use crate::config::Config;
use crate::document::{Document, SanitizedDocument};
use crate::error::{ModelError, ModelResult};
use crate::render::{self, BlankLines, LayoutRecorder, PageGeometry, PdfSink, RenderStats};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Layout options used when rendering a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub geometry: PageGeometry,
    pub blank_lines: BlankLines,
}

/// Statistics about one generated model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Pages found in the source text
    pub input_pages: usize,

    /// Pages written to the model
    pub output_pages: usize,

    /// Raw lines read
    pub lines_read: usize,

    /// Lines dropped as blank
    pub lines_suppressed: usize,

    /// Lines whose text changed during redaction (beyond trimming)
    pub lines_rewritten: usize,

    /// Lines cut at the character limit
    pub lines_truncated: usize,
}

impl GenerationReport {
    /// Returns true if redaction changed any line.
    pub fn has_rewrites(&self) -> bool {
        self.lines_rewritten > 0
    }

    fn from_parts(doc: &Document, sanitized: &SanitizedDocument, stats: &RenderStats) -> Self {
        let mut report = Self {
            input_pages: doc.page_count(),
            output_pages: stats.output_pages,
            lines_read: doc.line_count(),
            lines_truncated: stats.lines_truncated,
            ..Default::default()
        };

        for (raw_page, page) in doc.pages.iter().zip(&sanitized.pages) {
            for (raw, line) in raw_page.lines.iter().zip(&page.lines) {
                if line.is_empty() {
                    report.lines_suppressed += 1;
                } else if raw.trim() != line {
                    report.lines_rewritten += 1;
                }
            }
        }
        report
    }
}

/// Outcome of one document in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    pub result: ModelResult<GenerationReport>,
}

/// Typed-model generator coordinating extraction, redaction and rendering.
pub struct ModelGenerator {
    extractor: Box<dyn TextExtractor>,
    rules: RuleSet,
    options: RenderOptions,
}

impl ModelGenerator {
    /// Creates a generator from its parts.
    pub fn new(extractor: Box<dyn TextExtractor>, rules: RuleSet, options: RenderOptions) -> Self {
        Self {
            extractor,
            rules,
            options,
        }
    }

    /// Generator with the built-in tables, default layout and `pdftotext`
    /// extraction.
    pub fn with_defaults() -> ModelResult<Self> {
        Self::from_config(&Config::default())
    }

    /// Generator configured from a [`Config`].
    pub fn from_config(config: &Config) -> ModelResult<Self> {
        config.validate()?;
        Ok(Self::new(
            extractor_for(config.extractor, &config.pdftotext_binary),
            RuleSet::from_config(&config.rules)?,
            RenderOptions {
                geometry: config.layout.geometry.clone(),
                blank_lines: config.layout.blank_lines(),
            },
        ))
    }

    /// Replaces the text extractor.
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Extracts the page-delimited text of a source PDF.
    pub fn extract_text(&self, input: &Path) -> ModelResult<String> {
        if !input.exists() {
            return Err(ModelError::Io {
                path: input.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Input file does not exist",
                ),
            });
        }
        log::debug!(
            "Extracting {} with {}",
            input.display(),
            self.extractor.name()
        );
        // Parsers may panic on malformed files; keep that local to this document
        panic::catch_unwind(AssertUnwindSafe(|| self.extractor.extract(input))).unwrap_or_else(
            |payload| {
                Err(ModelError::TextExtraction {
                    path: input.to_path_buf(),
                    reason: format!(
                        "{} extractor panicked: {}",
                        self.extractor.name(),
                        panic_message(payload.as_ref())
                    ),
                })
            },
        )
    }

    /// Extracts and splits a source PDF into pages.
    pub fn load(&self, input: &Path) -> ModelResult<Document> {
        let text = self.extract_text(input)?;
        Ok(Document::from_text(input, &text))
    }

    /// Runs every line of `doc` through the rule set.
    pub fn sanitize_document(&self, doc: &Document) -> SanitizedDocument {
        SanitizedDocument {
            source: doc.source.clone(),
            pages: doc
                .pages
                .iter()
                .map(|page| self.rules.sanitize_page(page))
                .collect(),
        }
    }

    /// Sanitizes already-extracted text, keeping page markers.
    pub fn sanitize_text(&self, text: &str) -> String {
        let doc = Document::from_text("<text>", text);
        self.sanitize_document(&doc).to_text()
    }

    /// Lays out a source document without writing a PDF.
    pub fn layout(&self, input: &Path) -> ModelResult<(SanitizedDocument, RenderStats)> {
        let doc = self.load(input)?;
        let sanitized = self.sanitize_document(&doc);
        let mut recorder = LayoutRecorder::new();
        let stats = render::render(
            &sanitized.pages,
            &self.options.geometry,
            self.options.blank_lines,
            &mut recorder,
        )?;
        Ok((sanitized, stats))
    }

    /// Generates the typed model of `input` at `output`.
    ///
    /// Extraction failure aborts before anything is written. The output is
    /// only visible once fully encoded.
    pub fn generate(&self, input: &Path, output: &Path) -> ModelResult<GenerationReport> {
        let doc = self.load(input)?;
        let sanitized = self.sanitize_document(&doc);

        let title = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "typed model".to_string());
        let mut sink = PdfSink::new(&title, &self.options.geometry)?;
        let stats = render::render(
            &sanitized.pages,
            &self.options.geometry,
            self.options.blank_lines,
            &mut sink,
        )?;
        sink.finish(output)?;

        let report = GenerationReport::from_parts(&doc, &sanitized, &stats);
        log::info!(
            "Generated {} ({} input page(s) -> {} output page(s), {} line(s) rewritten)",
            output.display(),
            report.input_pages,
            report.output_pages,
            report.lines_rewritten
        );
        Ok(report)
    }

    /// Generates several models in parallel.
    ///
    /// A failing document never stops the others; every job gets its own
    /// outcome, in input order.
    pub fn generate_batch(&self, jobs: &[(PathBuf, PathBuf)]) -> Vec<BatchOutcome> {
        jobs.par_iter()
            .map(|(source, output)| {
                let result = self.generate(source, output);
                if let Err(e) = &result {
                    log::warn!("Skipping {}: {}", source.display(), e);
                }
                BatchOutcome {
                    source: source.clone(),
                    output: output.clone(),
                    result,
                }
            })
            .collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown cause"
    }
}

/// Output path for `source` inside `output_dir`: same file name.
pub fn batch_output_path(source: &Path, output_dir: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "model.pdf".into());
    output_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedText(&'static str);

    impl TextExtractor for FixedText {
        fn extract(&self, _input: &Path) -> ModelResult<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn generator(text: &'static str) -> ModelGenerator {
        ModelGenerator::with_defaults()
            .unwrap()
            .with_extractor(Box::new(FixedText(text)))
    }

    #[test]
    fn test_missing_input_rejected() {
        let err = generator("x")
            .generate(Path::new("/nonexistent.pdf"), Path::new("/tmp/out.pdf"))
            .unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn test_sanitize_text_keeps_pages() {
        let out = generator("").sanitize_text("Mara\n\u{0C}CPF 123.456.789-01\n");
        assert_eq!(out, "PPPPP\n\u{0C}CPF 000.000.000-00\n");
    }

    #[test]
    fn test_report_counts() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.pdf");
        std::fs::write(&input, b"%PDF-stub").unwrap();
        let output = dir.path().join("out.pdf");

        let report = generator("Despacho\n\nMara\n  fls. 1  \n")
            .generate(&input, &output)
            .unwrap();
        assert_eq!(report.input_pages, 1);
        assert_eq!(report.output_pages, 1);
        assert_eq!(report.lines_read, 4);
        assert_eq!(report.lines_suppressed, 1);
        assert_eq!(report.lines_rewritten, 2);
        assert!(report.has_rewrites());
        assert!(output.exists());
    }

    struct Exploding;

    impl TextExtractor for Exploding {
        fn extract(&self, _input: &Path) -> ModelResult<String> {
            panic!("invalid xref table")
        }

        fn name(&self) -> &str {
            "exploding"
        }
    }

    #[test]
    fn test_extractor_panic_becomes_extraction_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("in.pdf");
        std::fs::write(&input, b"%PDF-stub").unwrap();

        let generator = generator("").with_extractor(Box::new(Exploding));
        match generator.extract_text(&input).unwrap_err() {
            ModelError::TextExtraction { path, reason } => {
                assert_eq!(path, input);
                assert!(reason.contains("invalid xref table"), "{}", reason);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_batch_output_path() {
        assert_eq!(
            batch_output_path(Path::new("/src/a/modelo.pdf"), Path::new("/out")),
            PathBuf::from("/out/modelo.pdf")
        );
    }
}
