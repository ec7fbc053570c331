//! Glyph extraction
//!
//! Turns decoded PDF pages into positioned fragments and a reconstructed
//! full-text string.
//!
//! ```text
//! GlyphSource ──decode_page──▶ GlyphRun[] ──normalize──▶ PositionedFragment[]
//!                                                        │
//!                                         sort (line buckets, then x)
//!                                                        │
//!                                   reconstruct ──▶ page text ──▶ clean ──▶ full text
//! ```
//!
//! Pages are processed strictly in order and any page failure aborts the
//! document, so callers never persist a partial extraction.

mod cancel;
mod clean;
mod extractor;
mod layout;
mod types;

pub use cancel::CancellationToken;
pub use clean::{clean_full_text, truncate_chars};
pub use extractor::{ExtractionError, GlyphExtractor};
pub use layout::{normalize_run, reconstruct_page_text, reconstruct_text, sort_reading_order};
pub use types::{
    ExtractedDocumentText, Extraction, ExtractorConfig, PositionedFragment, MAX_FULL_TEXT_CHARS,
    PAGE_SEPARATOR, SAME_LINE_TOLERANCE, WORD_GAP_TOLERANCE,
};
