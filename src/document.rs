//! Page-structured views of extracted and sanitized text.

use std::path::{Path, PathBuf};

/// Character the text extractor places between pages.
pub const PAGE_BREAK: char = '\u{0C}';

/// One page of raw extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number in the source document
    pub number: usize,
    pub lines: Vec<String>,
}

/// A source document split into pages and lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source: PathBuf,
    pub pages: Vec<Page>,
}

impl Document {
    /// Splits extractor output on [`PAGE_BREAK`].
    ///
    /// A trailing whitespace-only page after the final marker is dropped;
    /// every other page is kept, even when blank, so page boundaries map
    /// 1:1 onto the rendered output.
    pub fn from_text(source: impl AsRef<Path>, text: &str) -> Self {
        let mut chunks: Vec<&str> = text.split(PAGE_BREAK).collect();
        if chunks.last().is_some_and(|last| last.trim().is_empty()) {
            chunks.pop();
        }

        let pages = chunks
            .into_iter()
            .enumerate()
            .map(|(idx, chunk)| Page {
                number: idx + 1,
                lines: chunk.lines().map(str::to_string).collect(),
            })
            .collect();

        Self {
            source: source.as_ref().to_path_buf(),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}

/// One page after redaction. Empty lines are suppressed lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedPage {
    pub number: usize,
    pub lines: Vec<String>,
}

impl SanitizedPage {
    /// Lines that will actually be drawn.
    pub fn visible_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|line| !line.is_empty())
    }
}

/// A whole document after redaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedDocument {
    pub source: PathBuf,
    pub pages: Vec<SanitizedPage>,
}

impl SanitizedDocument {
    /// Reassembles the sanitized text with page markers, the inverse of
    /// [`Document::from_text`].
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| {
                let mut text = page.lines.join("\n");
                text.push('\n');
                text
            })
            .collect::<Vec<_>>()
            .join(&PAGE_BREAK.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_and_drop_trailing_blank_page() {
        let doc = Document::from_text("a.pdf", "one\ntwo\n\u{0C}three\n\u{0C}  \n");
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].lines, vec!["one", "two"]);
        assert_eq!(doc.pages[1].number, 2);
        assert_eq!(doc.line_count(), 3);
    }

    #[test]
    fn test_blank_middle_page_is_kept() {
        let doc = Document::from_text("a.pdf", "one\u{0C}\u{0C}three");
        assert_eq!(doc.page_count(), 3);
        assert!(doc.pages[1].lines.is_empty());
    }

    #[test]
    fn test_empty_text_has_no_pages() {
        assert_eq!(Document::from_text("a.pdf", "").page_count(), 0);
    }

    #[test]
    fn test_crlf_lines() {
        let doc = Document::from_text("a.pdf", "one\r\ntwo\r\n");
        assert_eq!(doc.pages[0].lines, vec!["one", "two"]);
    }

    #[test]
    fn test_visible_lines_skip_suppressed() {
        let page = SanitizedPage {
            number: 1,
            lines: vec!["a".into(), String::new(), "b".into()],
        };
        assert_eq!(page.visible_lines().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
