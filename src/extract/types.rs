//! Extraction output types

use serde::{Deserialize, Serialize};

/// Two runs whose normalized `y` differ by at most this are on one line
pub const SAME_LINE_TOLERANCE: f64 = 0.01;

/// Horizontal gap (normalized) above which a space separates two runs
pub const WORD_GAP_TOLERANCE: f64 = 0.02;

/// Maximum stored length of the reconstructed full text, in characters
pub const MAX_FULL_TEXT_CHARS: usize = 50_000;

/// Separator appended after every page's reconstructed text
pub const PAGE_SEPARATOR: &str = "\n\n";

/// One positioned unit of extracted text
///
/// Coordinates are fractions of the page viewport with a top-left origin.
/// Each value is clamped to [0, 1] individually, so `x + width` may exceed 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedFragment {
    /// Trimmed, non-empty run text
    pub text: String,
    /// Page number (1-indexed)
    pub page_number: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PositionedFragment {
    /// Right edge of the fragment (may exceed 1)
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Reconstructed document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocumentText {
    pub page_count: usize,
    pub full_text: String,
}

/// Full result of one extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub text: ExtractedDocumentText,
    /// Fragments in page order, each page in reading order
    pub fragments: Vec<PositionedFragment>,
}

impl Extraction {
    /// Fragments belonging to one page
    pub fn page_fragments(&self, page_number: u32) -> impl Iterator<Item = &PositionedFragment> {
        self.fragments
            .iter()
            .filter(move |f| f.page_number == page_number)
    }
}

/// Extractor tuning
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    pub same_line_tolerance: f64,
    pub word_gap_tolerance: f64,
    pub max_full_text_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            same_line_tolerance: SAME_LINE_TOLERANCE,
            word_gap_tolerance: WORD_GAP_TOLERANCE,
            max_full_text_chars: MAX_FULL_TEXT_CHARS,
        }
    }
}
