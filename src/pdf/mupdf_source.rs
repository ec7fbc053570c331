//! MuPDF-backed glyph source
//!
//! Uses the structured text (stext) API. Every stext line becomes one
//! [`GlyphRun`]; MuPDF reports top-down coordinates, so the baseline is
//! flipped back to PDF's bottom-up convention before it leaves this module.

use mupdf::Document;

use super::source::{GlyphSource, PdfError};
use super::types::{DecodedPage, DecoderConfig, GlyphRun, Viewport};

const PDF_MIME: &str = "application/pdf";

/// Glyph source over an in-memory PDF
///
/// Not `Send`: MuPDF contexts are thread-bound, so build one of these on the
/// thread that runs the extraction.
pub struct MupdfSource {
    doc: Document,
    config: DecoderConfig,
    page_count: usize,
}

impl MupdfSource {
    /// Open a PDF from bytes
    pub fn from_bytes(data: &[u8], config: DecoderConfig) -> Result<Self, PdfError> {
        let doc =
            Document::from_bytes(data, PDF_MIME).map_err(|e| PdfError::Open(e.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|e| PdfError::Open(e.to_string()))?
            .max(0) as usize;

        Ok(Self {
            doc,
            config,
            page_count,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    fn decode(&self, page_number: u32) -> Result<DecodedPage, PdfError> {
        let page = self.doc.load_page((page_number - 1) as i32)?;
        let bounds = page.bounds()?;

        // Geometry is always taken at scale 1.0 with no rotation.
        let viewport = Viewport::new(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0);
        let text_page = page.to_text_page(self.config.to_mupdf_options())?;

        let mut runs = Vec::new();

        for block in text_page.blocks() {
            for line in block.lines() {
                let mut text = String::new();
                let mut left = f32::MAX;
                let mut top = f32::MAX;
                let mut right = f32::MIN;
                let mut bottom = f32::MIN;
                let mut font_size = 0.0f32;

                for ch in line.chars() {
                    let Some(c) = ch.char() else {
                        continue;
                    };
                    let quad = ch.quad();

                    left = left.min(quad.ul.x.min(quad.ll.x));
                    top = top.min(quad.ul.y.min(quad.ur.y));
                    right = right.max(quad.ur.x.max(quad.lr.x));
                    bottom = bottom.max(quad.ll.y.max(quad.lr.y));
                    if text.is_empty() {
                        font_size = ch.size();
                    }
                    text.push(c);
                }

                if text.is_empty() {
                    continue;
                }

                let x = left - bounds.x0;
                let baseline = viewport.height - (bottom - bounds.y0);

                runs.push(GlyphRun {
                    text,
                    transform: [font_size, 0.0, 0.0, font_size, x, baseline],
                    width: (right - left).max(0.0),
                    height: (bottom - top).abs(),
                });
            }
        }

        Ok(DecodedPage {
            page_number,
            viewport,
            runs,
        })
    }
}

impl GlyphSource for MupdfSource {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn decode_page(&self, page_number: u32) -> Result<DecodedPage, PdfError> {
        if page_number < 1 || page_number as usize > self.page_count {
            return Err(PdfError::PageOutOfRange {
                page: page_number,
                count: self.page_count,
            });
        }

        self.decode(page_number).map_err(|e| match e {
            PdfError::MuPdf(message) => PdfError::PageDecode {
                page: page_number,
                message,
            },
            other => other,
        })
    }
}
