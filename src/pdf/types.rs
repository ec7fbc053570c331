//! PDF decoding types
//!
//! Strongly typed values produced at the decoding boundary. Everything here
//! is in page space (points at scale 1.0) using PDF's bottom-up y axis.

use mupdf::TextPageOptions;
use serde::{Deserialize, Serialize};

/// A contiguous span of rendered text sharing one positioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphRun {
    /// Text as returned by the decoder, untrimmed
    pub text: String,
    /// Text matrix `[a, b, c, d, e, f]`; `e` is x, `f` is the baseline
    /// measured from the bottom of the page
    pub transform: [f32; 6],
    /// Rendered width in points
    pub width: f32,
    /// Rendered height in points
    pub height: f32,
}

impl GlyphRun {
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            text: text.into(),
            transform: [height, 0.0, 0.0, height, x, y],
            width,
            height,
        }
    }

    /// Horizontal origin in page space
    pub fn origin_x(&self) -> f32 {
        self.transform[4]
    }

    /// Baseline in page space (bottom-up)
    pub fn origin_y(&self) -> f32 {
        self.transform[5]
    }
}

/// Page viewport at the reference scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// US Letter at 72 DPI
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }
}

/// One decoded page: its viewport and the raw runs in content-stream order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPage {
    /// Page number (1-indexed)
    pub page_number: u32,
    pub viewport: Viewport,
    pub runs: Vec<GlyphRun>,
}

/// Decoder configuration passed to a [`GlyphSource`](super::GlyphSource)
/// at construction time
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Keep whitespace characters inside runs
    pub preserve_whitespace: bool,
    /// Keep ligatures as single glyphs instead of expanding them
    pub preserve_ligatures: bool,
    /// Do not synthesize spaces between widely spaced glyphs
    pub inhibit_spaces: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            preserve_whitespace: true,
            preserve_ligatures: false,
            inhibit_spaces: false,
        }
    }
}

impl DecoderConfig {
    /// Convert to MuPDF TextPageOptions
    pub fn to_mupdf_options(&self) -> TextPageOptions {
        let mut opts = TextPageOptions::empty();

        if self.preserve_whitespace {
            opts |= TextPageOptions::PRESERVE_WHITESPACE;
        }
        if self.preserve_ligatures {
            opts |= TextPageOptions::PRESERVE_LIGATURES;
        }
        if self.inhibit_spaces {
            opts |= TextPageOptions::INHIBIT_SPACES;
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_run_origin() {
        let run = GlyphRun::new("Hello", 61.2, 712.8, 122.4, 39.6);
        assert_eq!(run.origin_x(), 61.2);
        assert_eq!(run.origin_y(), 712.8);
        assert_eq!(run.transform[0], 39.6);
    }

    #[test]
    fn test_decoder_config_default_preserves_whitespace() {
        let opts = DecoderConfig::default().to_mupdf_options();
        assert!(opts.contains(TextPageOptions::PRESERVE_WHITESPACE));
        assert!(!opts.contains(TextPageOptions::INHIBIT_SPACES));
    }

    #[test]
    fn test_decoder_config_empty_options() {
        let config = DecoderConfig {
            preserve_whitespace: false,
            ..Default::default()
        };
        assert!(config.to_mupdf_options().is_empty());
    }
}
