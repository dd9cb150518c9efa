//! PDF inspection helpers.

use anyhow::Result;
use std::path::Path;

/// Number of pages in a written PDF.
pub fn pdf_page_count(pdf_path: &Path) -> Result<usize> {
    let doc = lopdf::Document::load(pdf_path)?;
    Ok(doc.get_pages().len())
}

/// Validates that a PDF is loadable and has basic structure.
pub fn is_valid_pdf(pdf_path: &Path) -> bool {
    lopdf::Document::load(pdf_path).is_ok()
}

/// Files in `dir` whose name ends with `suffix`.
pub fn files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.ends_with(suffix) {
            names.push(name);
        }
    }
    Ok(names)
}
