//! Page renderer: reflows sanitized lines onto fixed-geometry pages.
//!
//! The paginator is a small state machine carrying a vertical cursor across
//! lines. It talks to a [`PageSink`] only, so the break logic can be
//! exercised with [`LayoutRecorder`] without encoding any PDF.

pub mod pdf;

pub use pdf::PdfSink;

use crate::document::SanitizedPage;
use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Fixed page geometry, in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub left_margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub line_height: f32,
    pub font_size: f32,
    /// Characters drawn per line; the rest is cut, never wrapped
    pub max_chars: usize,
}

impl Default for PageGeometry {
    /// ISO A4 with the margins of the typed-model layout.
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            left_margin: 28.0,
            top_margin: 36.0,
            bottom_margin: 32.0,
            line_height: 11.0,
            font_size: 10.0,
            max_chars: 180,
        }
    }
}

impl PageGeometry {
    /// Baseline of the first line on a page.
    pub fn top(&self) -> f32 {
        self.page_height - self.top_margin
    }

    /// Number of lines drawn on one output page before a break.
    ///
    /// A line is drawn whenever the cursor has not yet dropped below the
    /// bottom margin, so the last line may sit exactly on it.
    pub fn lines_per_page(&self) -> usize {
        let span = (self.top() - self.bottom_margin).max(0.0);
        (span / self.line_height).floor() as usize + 1
    }

    /// Rejects geometries the paginator cannot lay out.
    pub fn validate(&self) -> ModelResult<()> {
        let invalid = |parameter: &str, reason: &str| ModelError::InvalidInput {
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        };

        if !(self.line_height > 0.0) {
            return Err(invalid("line_height", "must be positive"));
        }
        if !(self.font_size > 0.0) {
            return Err(invalid("font_size", "must be positive"));
        }
        if self.max_chars == 0 {
            return Err(invalid("max_chars", "must be at least 1"));
        }
        if !(self.page_width > 0.0) || !(self.page_height > 0.0) {
            return Err(invalid("page size", "width and height must be positive"));
        }
        if self.top() < self.bottom_margin {
            return Err(invalid(
                "margins",
                "top and bottom margins leave no drawable area",
            ));
        }
        if self.left_margin < 0.0 || self.left_margin >= self.page_width {
            return Err(invalid("left_margin", "must fall inside the page"));
        }
        Ok(())
    }
}

/// What to do with empty sanitized lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankLines {
    /// Blank lines advance the cursor, keeping the source's vertical rhythm
    #[default]
    Advance,
    /// Suppressed lines take no vertical space
    Skip,
}

/// Destination for painted pages.
pub trait PageSink {
    /// Starts output page `index` (0-based).
    fn begin_page(&mut self, index: usize) -> ModelResult<()>;

    /// Draws one line with its baseline at `(x, y)`, measured from the
    /// bottom-left corner.
    fn draw_line(&mut self, x: f32, y: f32, text: &str) -> ModelResult<()>;

    /// Finishes the current page.
    fn end_page(&mut self) -> ModelResult<()>;
}

/// Statistics about one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub output_pages: usize,
    pub lines_drawn: usize,
    pub lines_truncated: usize,
    /// Output pages produced by each input page, in input order
    pub pages_per_input: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Drawing,
    AboutToBreak,
}

struct Cursor {
    y: f32,
    state: CursorState,
}

/// Drives a [`PageSink`] through the page-break state machine.
struct Paginator<'a, S: PageSink> {
    geometry: &'a PageGeometry,
    blank_lines: BlankLines,
    sink: &'a mut S,
    cursor: Cursor,
    stats: RenderStats,
}

impl<'a, S: PageSink> Paginator<'a, S> {
    fn new(geometry: &'a PageGeometry, blank_lines: BlankLines, sink: &'a mut S) -> Self {
        Self {
            geometry,
            blank_lines,
            sink,
            cursor: Cursor {
                y: geometry.top(),
                state: CursorState::Drawing,
            },
            stats: RenderStats::default(),
        }
    }

    fn begin_page(&mut self) -> ModelResult<()> {
        self.sink.begin_page(self.stats.output_pages)?;
        self.stats.output_pages += 1;
        self.cursor = Cursor {
            y: self.geometry.top(),
            state: CursorState::Drawing,
        };
        Ok(())
    }

    fn render_input_page(&mut self, page: &SanitizedPage) -> ModelResult<()> {
        let first_output = self.stats.output_pages;
        self.begin_page()?;

        for line in &page.lines {
            if line.is_empty() && self.blank_lines == BlankLines::Skip {
                continue;
            }

            // Break lazily: only once another line actually needs the space
            if self.cursor.state == CursorState::AboutToBreak {
                self.sink.end_page()?;
                self.begin_page()?;
            }

            if !line.is_empty() {
                let text = self.clip(line);
                self.sink
                    .draw_line(self.geometry.left_margin, self.cursor.y, &text)?;
                self.stats.lines_drawn += 1;
            }

            self.cursor.y -= self.geometry.line_height;
            if self.cursor.y < self.geometry.bottom_margin {
                self.cursor.state = CursorState::AboutToBreak;
            }
        }

        // Input pages never share an output page
        self.sink.end_page()?;
        self.stats
            .pages_per_input
            .push(self.stats.output_pages - first_output);
        Ok(())
    }

    fn clip(&mut self, line: &str) -> String {
        let max = self.geometry.max_chars;
        match line.char_indices().nth(max) {
            Some((cut, _)) => {
                self.stats.lines_truncated += 1;
                line[..cut].to_string()
            }
            None => line.to_string(),
        }
    }

    fn finish(self) -> RenderStats {
        self.stats
    }
}

/// Lays out sanitized pages onto `sink`.
///
/// Each input page starts a fresh output page and may spill onto further
/// pages when its lines exceed [`PageGeometry::lines_per_page`]. An empty
/// page list produces a single blank page.
pub fn render<S: PageSink>(
    pages: &[SanitizedPage],
    geometry: &PageGeometry,
    blank_lines: BlankLines,
    sink: &mut S,
) -> ModelResult<RenderStats> {
    geometry.validate()?;
    let mut paginator = Paginator::new(geometry, blank_lines, sink);

    if pages.is_empty() {
        paginator.begin_page()?;
        paginator.sink.end_page()?;
        return Ok(paginator.finish());
    }

    for page in pages {
        paginator.render_input_page(page)?;
    }

    let stats = paginator.finish();
    if stats.lines_truncated > 0 {
        log::warn!(
            "{} line(s) exceeded {} characters and were truncated",
            stats.lines_truncated,
            geometry.max_chars
        );
    }
    Ok(stats)
}

/// A line as placed on a recorded page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// In-memory sink recording every page and line, for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct LayoutRecorder {
    pages: Vec<Vec<PlacedLine>>,
    open: bool,
}

impl LayoutRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Vec<PlacedLine>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text of every line on `page`, top to bottom.
    pub fn page_text(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page)
            .map(|lines| lines.iter().map(|l| l.text.as_str()).collect())
            .unwrap_or_default()
    }
}

impl PageSink for LayoutRecorder {
    fn begin_page(&mut self, index: usize) -> ModelResult<()> {
        if self.open || index != self.pages.len() {
            return Err(ModelError::rendering("page started out of sequence", Some(index + 1)));
        }
        self.pages.push(Vec::new());
        self.open = true;
        Ok(())
    }

    fn draw_line(&mut self, x: f32, y: f32, text: &str) -> ModelResult<()> {
        match self.pages.last_mut() {
            Some(page) if self.open => {
                page.push(PlacedLine {
                    x,
                    y,
                    text: text.to_string(),
                });
                Ok(())
            }
            _ => Err(ModelError::rendering("line drawn outside a page", None)),
        }
    }

    fn end_page(&mut self) -> ModelResult<()> {
        if !self.open {
            return Err(ModelError::rendering("no page to end", None));
        }
        self.open = false;
        Ok(())
    }
}
