//! Document ingestion: wrap uploaded PDF bytes, extract per-page text,
//! enforce provider limits.
//!
//! ## Why extraction never fails the load
//!
//! The native-document provider receives the raw bytes and never needs the
//! extracted text, so an unreadable PDF must not block that path. Extraction
//! is attempted once at load time; a failure is recorded on the `Document`
//! and only surfaces as [`AnalyzeError::ParseFailed`] when the text-only
//! path actually asks for text via [`Document::require_text`].
//!
//! Text comes from the `pdf-extract` crate, which separates pages with a
//! form-feed character in its output. We split on that to recover per-page
//! text and the page count, then re-join with explicit 1-indexed
//! `--- Page N ---` markers so the model can reference pages reliably.

use crate::error::AnalyzeError;
use tracing::{debug, warn};

/// Maximum document size accepted for dispatch: 32 MiB.
///
/// The native-document API rejects larger uploads; we enforce the same bound
/// locally so the user gets an immediate, actionable error instead of a
/// failed (and possibly billed) remote call.
pub const MAX_DOCUMENT_BYTES: u64 = 32 * 1024 * 1024;

/// Maximum page count accepted for dispatch.
///
/// Mirrors the native-document provider's limit; cost also grows linearly
/// with pages, so this doubles as a spend guard.
pub const MAX_PAGES: usize = 100;

/// An uploaded PDF, immutable for the lifetime of one analysis request.
#[derive(Debug, Clone)]
pub struct Document {
    /// Original file name, e.g. `report.pdf`. Used for archive entry names.
    pub name: String,
    /// Raw PDF bytes, passed through untouched to the native provider and
    /// into the result archive.
    pub bytes: Vec<u8>,
    /// Number of pages, when the PDF parsed. `None` means extraction failed.
    pub page_count: Option<usize>,
    /// Extracted text with `--- Page N ---` markers, when the PDF parsed.
    pub text: Option<String>,
    /// Why extraction failed, when it did.
    pub parse_error: Option<String>,
}

impl Document {
    /// Wrap uploaded bytes, attempting text extraction.
    ///
    /// Never fails: an unreadable PDF yields a document with
    /// `text == None`, usable on the native-document path only.
    pub fn load(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        match extract_text(&bytes) {
            Ok((text, page_count)) => {
                debug!(
                    "Extracted {} chars from {} pages of '{}'",
                    text.len(),
                    page_count,
                    name
                );
                Self {
                    name,
                    bytes,
                    page_count: Some(page_count),
                    text: Some(text),
                    parse_error: None,
                }
            }
            Err(detail) => {
                warn!("Text extraction failed for '{}': {}", name, detail);
                Self {
                    name,
                    bytes,
                    page_count: None,
                    text: None,
                    parse_error: Some(detail),
                }
            }
        }
    }

    /// Document size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// File name without a trailing `.pdf` extension, for archive entry names.
    pub fn stem(&self) -> &str {
        self.name
            .strip_suffix(".pdf")
            .or_else(|| self.name.strip_suffix(".PDF"))
            .unwrap_or(&self.name)
    }

    /// Enforce the size and page-count limits before dispatch.
    ///
    /// Exactly 32 MiB and exactly 100 pages pass. An unparseable document has
    /// no known page count, so only the size bound applies to it.
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        validate_limits(self.size_bytes(), self.page_count)
    }

    /// Extracted text, or [`AnalyzeError::ParseFailed`] when the PDF was
    /// unreadable. Only the text-only provider path calls this.
    pub fn require_text(&self) -> Result<&str, AnalyzeError> {
        self.text
            .as_deref()
            .ok_or_else(|| AnalyzeError::ParseFailed {
                name: self.name.clone(),
                detail: self
                    .parse_error
                    .clone()
                    .unwrap_or_else(|| "no extractable text".to_string()),
            })
    }
}

/// Pure limit check, shared by [`Document::validate`] and tests.
pub fn validate_limits(size_bytes: u64, page_count: Option<usize>) -> Result<(), AnalyzeError> {
    if size_bytes > MAX_DOCUMENT_BYTES {
        return Err(AnalyzeError::DocumentTooLarge {
            size_bytes,
            limit_bytes: MAX_DOCUMENT_BYTES,
        });
    }
    if let Some(pages) = page_count {
        if pages > MAX_PAGES {
            return Err(AnalyzeError::TooManyPages {
                pages,
                limit: MAX_PAGES,
            });
        }
    }
    Ok(())
}

/// Extract plain text and a page count from PDF bytes.
///
/// `pdf-extract` emits a form feed (`\x0c`) between pages; splitting on it
/// recovers the per-page segments. A trailing empty segment (text ending in
/// a form feed) is not a page and is dropped before counting.
fn extract_text(bytes: &[u8]) -> Result<(String, usize), String> {
    let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string())?;
    Ok(mark_pages(&raw))
}

/// Split raw extractor output on form feeds and re-join with page markers.
/// Returns the marked text and the page count.
fn mark_pages(raw: &str) -> (String, usize) {
    let mut pages: Vec<&str> = raw.split('\u{0C}').collect();
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }

    let mut text = String::with_capacity(raw.len() + pages.len() * 16);
    for (i, page) in pages.iter().enumerate() {
        text.push_str(&format!("\n\n--- Page {} ---\n", i + 1));
        text.push_str(page.trim_matches('\n'));
    }

    let page_count = pages.len();
    (text, page_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_boundary_exact_passes() {
        assert!(validate_limits(MAX_DOCUMENT_BYTES, Some(MAX_PAGES)).is_ok());
    }

    #[test]
    fn limits_one_byte_over_fails() {
        let err = validate_limits(MAX_DOCUMENT_BYTES + 1, Some(1)).unwrap_err();
        assert!(matches!(err, AnalyzeError::DocumentTooLarge { .. }));
    }

    #[test]
    fn limits_one_page_over_fails() {
        let err = validate_limits(1024, Some(MAX_PAGES + 1)).unwrap_err();
        assert!(matches!(err, AnalyzeError::TooManyPages { .. }));
    }

    #[test]
    fn limits_unknown_page_count_checks_size_only() {
        assert!(validate_limits(1024, None).is_ok());
        assert!(validate_limits(MAX_DOCUMENT_BYTES + 1, None).is_err());
    }

    #[test]
    fn load_tolerates_garbage_bytes() {
        let doc = Document::load("junk.pdf", b"not a pdf at all".to_vec());
        assert!(doc.text.is_none());
        assert!(doc.page_count.is_none());
        assert!(doc.parse_error.is_some());
        let err = doc.require_text().unwrap_err();
        assert!(matches!(err, AnalyzeError::ParseFailed { .. }));
    }

    #[test]
    fn stem_strips_pdf_extension() {
        let doc = Document::load("report.pdf", b"x".to_vec());
        assert_eq!(doc.stem(), "report");
        let doc = Document::load("notes.txt", b"x".to_vec());
        assert_eq!(doc.stem(), "notes.txt");
    }

    #[test]
    fn page_markers_are_one_indexed() {
        let (text, count) = mark_pages("first page\u{0C}second page");
        assert_eq!(count, 2);
        assert_eq!(
            text,
            "\n\n--- Page 1 ---\nfirst page\n\n--- Page 2 ---\nsecond page"
        );
    }

    #[test]
    fn trailing_form_feed_is_not_a_page() {
        let (_, count) = mark_pages("only page\u{0C}");
        assert_eq!(count, 1);
    }

    #[test]
    fn single_page_without_form_feed() {
        let (text, count) = mark_pages("just text");
        assert_eq!(count, 1);
        assert!(text.contains("--- Page 1 ---"));
        assert!(!text.contains("--- Page 2 ---"));
    }
}
