use super::layout::PageTextBuilder;
use crate::traits::TextExtractor;
use crate::{ExtractorError, Result};
use lopdf::Document;
use std::path::Path;
use tracing::{debug, info, warn};

/// Page text extraction backed by `lopdf`, with line breaks rebuilt from
/// text positioning (see [`PageTextBuilder`]).
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts text from an already loaded document, starting at the zero-based `start_page`.
    pub fn extract_from_document(doc: &Document, start_page: usize) -> Result<String> {
        if doc.is_encrypted() {
            return Err(ExtractorError::ExtractionError(
                "Encrypted PDF documents are not supported".to_string(),
            ));
        }

        let pages = doc.get_pages();
        if start_page >= pages.len() {
            warn!(
                "Start page {} is past the last page ({} pages); no text extracted",
                start_page,
                pages.len()
            );
            return Ok(String::new());
        }

        let mut text = String::new();
        for (page_num, page_id) in pages.iter().skip(start_page) {
            let page_text = PageTextBuilder::page_text(doc, *page_id).map_err(|e| match e {
                ExtractorError::ExtractionError(msg) => {
                    ExtractorError::ExtractionError(format!("Page {}: {}", page_num, msg))
                }
                other => other,
            })?;
            debug!("Page {}: {} bytes of text", page_num, page_text.len());

            text.push_str(&page_text);
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
        }

        info!(
            "Extracted {} pages ({} bytes of text)",
            pages.len() - start_page,
            text.len()
        );
        Ok(text)
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, source: &Path, start_page: usize) -> Result<String> {
        info!("Loading PDF: {}", source.display());
        let doc = Document::load(source).map_err(|e| {
            ExtractorError::ExtractionError(format!("{}: {}", source.display(), e))
        })?;
        Self::extract_from_document(&doc, start_page)
    }

    fn name(&self) -> &'static str {
        "lopdf"
    }
}
