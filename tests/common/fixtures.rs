//! Test fixtures: stub extractors and source-text builders.

use anyhow::Result;
use std::path::{Path, PathBuf};
use typed_model::{ModelError, ModelGenerator, ModelResult, TextExtractor, PAGE_BREAK};

/// Extractor returning the same text for every input.
#[derive(Debug, Clone)]
pub struct StaticExtractor {
    text: String,
}

impl StaticExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextExtractor for StaticExtractor {
    fn extract(&self, _input: &Path) -> ModelResult<String> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Extractor that always fails, as an unreadable PDF would.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingExtractor;

impl TextExtractor for FailingExtractor {
    fn extract(&self, input: &Path) -> ModelResult<String> {
        Err(ModelError::TextExtraction {
            path: input.to_path_buf(),
            reason: "no text layer".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Extractor whose parser blows up on files named `*corrompido*`.
#[derive(Debug, Clone)]
pub struct PanickingExtractor {
    text: String,
}

impl PanickingExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextExtractor for PanickingExtractor {
    fn extract(&self, input: &Path) -> ModelResult<String> {
        if input.to_string_lossy().contains("corrompido") {
            panic!("unexpected end of xref stream");
        }
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// Default generator reading its text from `text`.
pub fn generator_for(text: impl Into<String>) -> ModelGenerator {
    ModelGenerator::with_defaults()
        .expect("default generator")
        .with_extractor(Box::new(StaticExtractor::new(text)))
}

/// Writes a placeholder source file; stub extractors never read it.
pub fn placeholder_source(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4\n")?;
    Ok(path)
}

/// A page of `count` numbered lines.
pub fn numbered_lines(count: usize) -> String {
    (1..=count)
        .map(|i| format!("linha {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins page texts with the page marker.
pub fn join_pages(pages: &[String]) -> String {
    pages.join(&PAGE_BREAK.to_string())
}

/// Builder for multi-page source PDFs, one text object per line.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// SourcePdfBuilder::new()
///     .page(&["DESPACHO", "CPF 123.456.789-01"])
///     .page(&["Mamanguape, 1 de abril de 2024"])
///     .build(Path::new("/tmp/source.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourcePdfBuilder {
    pages: Vec<Vec<String>>,
}

impl SourcePdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a page with the given lines.
    pub fn page(mut self, lines: &[&str]) -> Self {
        self.pages.push(lines.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Writes the PDF to `output_path`.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        use printpdf::{BuiltinFont, Mm, PdfDocument};
        use std::io::BufWriter;

        let (doc, first_page, first_layer) =
            PdfDocument::new("source", Mm(210.0), Mm(297.0), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        for (idx, lines) in self.pages.iter().enumerate() {
            let (page, layer) = if idx == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(210.0), Mm(297.0), "Layer 1")
            };
            let layer = doc.get_page(page).get_layer(layer);
            for (row, line) in lines.iter().enumerate() {
                let y = 270.0 - row as f32 * 6.0;
                layer.use_text(line.as_str(), 11.0, Mm(20.0), Mm(y), &font);
            }
        }

        doc.save(&mut BufWriter::new(std::fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }
}
