use crate::Result;
use std::path::Path;

/// Source of page text for a document.
///
/// Implementations return the text of every page from `start_page`
/// (zero-based) to the end of the document, in reading order, with line
/// breaks preserved.
pub trait TextExtractor {
    fn extract_text(&self, source: &Path, start_page: usize) -> Result<String>;

    fn name(&self) -> &'static str;
}
