//! PDF decoding module
//!
//! Turns raw PDF bytes into typed glyph runs with page-space geometry.
//! [`GlyphSource`] is the boundary the extractor consumes; [`MupdfSource`]
//! is the production implementation and [`StaticSource`] serves fixtures.

mod mupdf_source;
mod source;
mod types;

pub use mupdf_source::MupdfSource;
pub use source::{GlyphSource, PdfError, StaticSource};
pub use types::{DecodedPage, DecoderConfig, GlyphRun, Viewport};
