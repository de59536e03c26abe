//! Plain-text extraction from PDF bytes.
//!
//! Uses `lopdf` directly on the in-memory byte stream — no temp files, no
//! native rendering library. Pages are visited in page order; pages whose
//! content streams decode to nothing (vector-only or scanned pages) are
//! skipped rather than contributing empty lines.

use crate::error::ExtractError;
use crate::output::{Document, PageText};
use tracing::{debug, warn};

/// Extract a [`Document`] from raw PDF bytes.
///
/// # Errors
/// * [`ExtractError::InvalidPdf`] — the bytes do not parse as a PDF.
/// * [`ExtractError::NoExtractableText`] — every page decoded to nothing
///   (typically a scanned, image-only report; OCR is out of scope).
pub fn extract_document(bytes: &[u8]) -> Result<Document, ExtractError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| ExtractError::InvalidPdf { detail: e.to_string() })?;

    let page_map = doc.get_pages();
    let total_pages = page_map.len();
    let mut pages: Vec<PageText> = Vec::with_capacity(total_pages);
    let mut full_text = String::new();

    for page_no in page_map.keys() {
        // A single undecodable page is not fatal; the rest of the report
        // usually carries the income statement anyway.
        let text = match doc.extract_text(&[*page_no]) {
            Ok(t) => t,
            Err(e) => {
                warn!("page {}: text extraction failed: {}", page_no, e);
                continue;
            }
        };
        if text.trim().is_empty() {
            debug!("page {}: no extractable text, skipping", page_no);
            continue;
        }
        full_text.push_str(text.trim_end());
        full_text.push('\n');
        pages.push(PageText {
            number: *page_no as usize,
            text,
        });
    }

    if full_text.trim().is_empty() {
        return Err(ExtractError::NoExtractableText { pages: total_pages });
    }

    debug!(
        "extracted {} chars from {}/{} pages",
        full_text.len(),
        pages.len(),
        total_pages
    );

    Ok(Document {
        pages,
        total_pages,
        full_text,
    })
}
