//! PDF sink backed by printpdf.
//!
//! Pages are painted with the built-in Helvetica face, so the output needs
//! no embedded font files. The finished document is written to a temporary
//! file next to the destination and renamed into place, so a failed run
//! never leaves a readable partial PDF behind.

use super::{PageGeometry, PageSink};
use crate::error::{ModelError, ModelResult};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex,
};
use std::io::{BufWriter, Write};
use std::path::Path;

const LAYER_NAME: &str = "Layer 1";

/// Converts PDF points to printpdf millimetres.
fn pt(value: f32) -> Mm {
    Mm(value * 25.4 / 72.0)
}

/// A [`PageSink`] producing a PDF document.
pub struct PdfSink {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_size: f32,
    width: Mm,
    height: Mm,
    /// printpdf creates the first page together with the document
    initial_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    layer: Option<PdfLayerReference>,
    pages: usize,
}

impl PdfSink {
    /// Creates an empty document with the given title and geometry.
    pub fn new(title: &str, geometry: &PageGeometry) -> ModelResult<Self> {
        let width = pt(geometry.page_width);
        let height = pt(geometry.page_height);
        let (doc, page, layer) = PdfDocument::new(title, width, height, LAYER_NAME);

        let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| {
            ModelError::rendering(format!("Failed to load Helvetica: {}", e), None)
        })?;

        Ok(Self {
            doc,
            font,
            font_size: geometry.font_size,
            width,
            height,
            initial_page: Some((page, layer)),
            layer: None,
            pages: 0,
        })
    }

    /// Number of pages begun so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Encodes the document and atomically moves it to `output`.
    pub fn finish(self, output: &Path) -> ModelResult<()> {
        if self.layer.is_some() {
            return Err(ModelError::rendering(
                "document finished with an open page",
                Some(self.pages),
            ));
        }

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::env::current_dir().map_err(|e| ModelError::Io {
                path: output.to_path_buf(),
                source: e,
            })?,
        };
        std::fs::create_dir_all(&dir).map_err(|e| ModelError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".typed-model-")
            .suffix(".pdf.part")
            .tempfile_in(&dir)
            .map_err(|e| ModelError::Io {
                path: dir.clone(),
                source: e,
            })?;

        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.doc.save(&mut writer).map_err(|e| {
                ModelError::rendering(format!("Failed to encode PDF: {}", e), None)
            })?;
            writer.flush().map_err(|e| ModelError::Io {
                path: output.to_path_buf(),
                source: e,
            })?;
        }

        tmp.persist(output).map_err(|e| ModelError::Io {
            path: output.to_path_buf(),
            source: e.error,
        })?;
        Ok(())
    }
}

impl PageSink for PdfSink {
    fn begin_page(&mut self, index: usize) -> ModelResult<()> {
        if self.layer.is_some() {
            return Err(ModelError::rendering(
                "page started while another is open",
                Some(index + 1),
            ));
        }

        let (page, layer) = match self.initial_page.take() {
            Some(first) => first,
            None => self.doc.add_page(self.width, self.height, LAYER_NAME),
        };
        self.layer = Some(self.doc.get_page(page).get_layer(layer));
        self.pages += 1;
        Ok(())
    }

    fn draw_line(&mut self, x: f32, y: f32, text: &str) -> ModelResult<()> {
        let layer = self
            .layer
            .as_ref()
            .ok_or_else(|| ModelError::rendering("line drawn outside a page", None))?;
        layer.use_text(text, self.font_size, pt(x), pt(y), &self.font);
        Ok(())
    }

    fn end_page(&mut self) -> ModelResult<()> {
        match self.layer.take() {
            Some(_) => Ok(()),
            None => Err(ModelError::rendering("no page to end", Some(self.pages))),
        }
    }
}
