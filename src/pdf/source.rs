//! Decoding boundary
//!
//! The extractor only ever sees [`DecodedPage`] values through this trait,
//! so the layout logic never depends on a concrete PDF library.

use thiserror::Error;

use super::types::DecodedPage;

/// PDF decoding errors
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    Open(String),
    #[error("Failed to decode page {page}: {message}")]
    PageDecode { page: u32, message: String },
    #[error("Page {page} not found (document has {count} pages)")]
    PageOutOfRange { page: u32, count: usize },
    #[error("MuPDF error: {0}")]
    MuPdf(String),
}

impl From<mupdf::Error> for PdfError {
    fn from(e: mupdf::Error) -> Self {
        PdfError::MuPdf(e.to_string())
    }
}

/// A source of decoded pages
///
/// Each `decode_page` call is an independent step; callers may stop between
/// pages without leaving anything half-open.
pub trait GlyphSource {
    /// Number of addressable pages
    fn page_count(&self) -> usize;

    /// Decode one page (1-indexed)
    fn decode_page(&self, page_number: u32) -> Result<DecodedPage, PdfError>;
}

impl<T: GlyphSource + ?Sized> GlyphSource for &T {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn decode_page(&self, page_number: u32) -> Result<DecodedPage, PdfError> {
        (**self).decode_page(page_number)
    }
}

/// In-memory source over already decoded pages
///
/// Pages are addressed by position; `page_number` on each entry is
/// overwritten on decode so callers can build fixtures loosely.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pages: Vec<Result<DecodedPage, String>>,
}

impl StaticSource {
    pub fn new(pages: Vec<DecodedPage>) -> Self {
        Self {
            pages: pages.into_iter().map(Ok).collect(),
        }
    }

    /// Append a page that fails to decode with the given message
    pub fn with_broken_page(mut self, message: impl Into<String>) -> Self {
        self.pages.push(Err(message.into()));
        self
    }
}

impl GlyphSource for StaticSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn decode_page(&self, page_number: u32) -> Result<DecodedPage, PdfError> {
        let index = (page_number as usize)
            .checked_sub(1)
            .filter(|i| *i < self.pages.len())
            .ok_or(PdfError::PageOutOfRange {
                page: page_number,
                count: self.pages.len(),
            })?;

        match &self.pages[index] {
            Ok(page) => Ok(DecodedPage {
                page_number,
                ..page.clone()
            }),
            Err(message) => Err(PdfError::PageDecode {
                page: page_number,
                message: message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::types::{GlyphRun, Viewport};

    fn page(text: &str) -> DecodedPage {
        DecodedPage {
            page_number: 0,
            viewport: Viewport::letter(),
            runs: vec![GlyphRun::new(text, 72.0, 700.0, 40.0, 12.0)],
        }
    }

    #[test]
    fn test_static_source_numbers_pages() {
        let source = StaticSource::new(vec![page("a"), page("b")]);
        assert_eq!(source.page_count(), 2);
        let decoded = source.decode_page(2).unwrap();
        assert_eq!(decoded.page_number, 2);
        assert_eq!(decoded.runs[0].text, "b");
    }

    #[test]
    fn test_static_source_out_of_range() {
        let source = StaticSource::new(vec![page("a")]);
        assert!(matches!(
            source.decode_page(0),
            Err(PdfError::PageOutOfRange { page: 0, count: 1 })
        ));
        assert!(matches!(
            source.decode_page(2),
            Err(PdfError::PageOutOfRange { page: 2, count: 1 })
        ));
    }

    #[test]
    fn test_static_source_broken_page() {
        let source = StaticSource::new(vec![page("a")]).with_broken_page("bad xref");
        let err = source.decode_page(2).unwrap_err();
        assert_eq!(err.to_string(), "Failed to decode page 2: bad xref");
    }
}
