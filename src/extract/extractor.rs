//! Glyph extractor
//!
//! Drives a [`GlyphSource`] page by page and produces the reconstructed
//! document text together with every positioned fragment.

use thiserror::Error;

use crate::pdf::{DecoderConfig, GlyphSource, MupdfSource, PdfError};

use super::cancel::CancellationToken;
use super::clean::clean_full_text;
use super::layout::{normalize_run, reconstruct_text, sort_reading_order};
use super::types::{
    ExtractedDocumentText, Extraction, ExtractorConfig, PositionedFragment, PAGE_SEPARATOR,
};

/// Extraction failures. Any of these aborts the whole document.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDF text extraction failed: {0}")]
    Open(#[source] PdfError),
    #[error("PDF text extraction failed on page {page}: {source}")]
    Page {
        page: u32,
        #[source]
        source: PdfError,
    },
    #[error("PDF has no pages")]
    EmptyDocument,
    #[error("Extraction cancelled before page {0}")]
    Cancelled(u32),
}

/// Stateless extractor; one instance can serve many documents
#[derive(Debug, Clone, Default)]
pub struct GlyphExtractor {
    config: ExtractorConfig,
    cancel: Option<CancellationToken>,
}

impl GlyphExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Stop at the next page boundary once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Open `data` with MuPDF and extract it
    pub fn extract_pdf(
        &self,
        data: &[u8],
        decoder: DecoderConfig,
    ) -> Result<Extraction, ExtractionError> {
        let source = MupdfSource::from_bytes(data, decoder).map_err(ExtractionError::Open)?;
        self.extract(&source)
    }

    /// Extract every page of `source`, in order
    pub fn extract<S: GlyphSource>(&self, source: &S) -> Result<Extraction, ExtractionError> {
        let page_count = source.page_count();
        if page_count == 0 {
            return Err(ExtractionError::EmptyDocument);
        }

        let mut raw_text = String::new();
        let mut fragments = Vec::new();

        for page_number in 1..=page_count as u32 {
            if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
                tracing::warn!("Extraction cancelled before page {}", page_number);
                return Err(ExtractionError::Cancelled(page_number));
            }

            let (page_fragments, lines) = self.extract_page(source, page_number)?;
            let page_text =
                reconstruct_text(&page_fragments, &lines, self.config.word_gap_tolerance);

            tracing::debug!(
                "Page {}: extracted {} text items",
                page_number,
                page_fragments.len()
            );

            raw_text.push_str(&page_text);
            raw_text.push_str(PAGE_SEPARATOR);
            fragments.extend(page_fragments);
        }

        tracing::info!(
            "Total text extraction: {} items across {} pages",
            fragments.len(),
            page_count
        );

        Ok(Extraction {
            text: ExtractedDocumentText {
                page_count,
                full_text: clean_full_text(&raw_text, self.config.max_full_text_chars),
            },
            fragments,
        })
    }

    /// Decode, filter, normalize and sort a single page; also returns the
    /// line index of each sorted fragment
    fn extract_page<S: GlyphSource>(
        &self,
        source: &S,
        page_number: u32,
    ) -> Result<(Vec<PositionedFragment>, Vec<usize>), ExtractionError> {
        let page = source.decode_page(page_number).map_err(|source| {
            tracing::error!("PDF extraction error on page {}: {}", page_number, source);
            ExtractionError::Page {
                page: page_number,
                source,
            }
        })?;

        let mut fragments: Vec<PositionedFragment> = page
            .runs
            .iter()
            .filter_map(|run| normalize_run(run, page_number, page.viewport))
            .collect();

        let lines = sort_reading_order(&mut fragments, self.config.same_line_tolerance);
        Ok((fragments, lines))
    }
}
