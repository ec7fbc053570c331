//! Highlight annotation types
//!
//! Coordinates use the same convention as extracted fragments: fractions of
//! the page viewport, origin top-left.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extract::PositionedFragment;

/// Color used for resolver-produced highlights
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffff00";

/// Geometry-rendering variant of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    /// Filled rectangle behind text
    #[default]
    Highlight,
    /// Ellipse around a region
    Circle,
    /// Arrow pointing at a region
    Arrow,
}

impl AnnotationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationType::Highlight => "highlight",
            AnnotationType::Circle => "circle",
            AnnotationType::Arrow => "arrow",
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, renderable region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightAnnotation {
    /// Page number (1-indexed)
    pub page_number: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub annotation_type: AnnotationType,
    /// CSS color
    pub color: String,
    /// Fragment text the region was taken from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
}

impl HighlightAnnotation {
    /// Highlight covering exactly one fragment
    pub fn from_fragment(fragment: &PositionedFragment, color: &str) -> Self {
        Self {
            page_number: fragment.page_number,
            x: fragment.x,
            y: fragment.y,
            width: fragment.width,
            height: fragment.height,
            annotation_type: AnnotationType::Highlight,
            color: color.to_string(),
            source_text: Some(fragment.text.clone()),
        }
    }
}

/// Request body for saving an annotation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnotation {
    pub page_number: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type", default)]
    pub annotation_type: AnnotationType,
    pub color: Option<String>,
    pub text: Option<String>,
}

impl CreateAnnotation {
    /// Check page number, geometry and color
    pub fn validate(&self) -> Result<(), String> {
        if self.page_number < 1 {
            return Err("pageNumber must be at least 1".to_string());
        }

        for (name, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0 and 1", name));
            }
        }

        if let Some(color) = &self.color {
            if color.trim().is_empty() {
                return Err("color must not be empty".to_string());
            }
        }

        Ok(())
    }

    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_HIGHLIGHT_COLOR)
    }
}

impl From<HighlightAnnotation> for CreateAnnotation {
    fn from(annotation: HighlightAnnotation) -> Self {
        Self {
            page_number: annotation.page_number,
            x: annotation.x,
            y: annotation.y,
            width: annotation.width,
            height: annotation.height,
            annotation_type: annotation.annotation_type,
            color: Some(annotation.color),
            text: annotation.source_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment() -> PositionedFragment {
        PositionedFragment {
            text: "gravity affects".to_string(),
            page_number: 3,
            x: 0.12,
            y: 0.4,
            width: 0.3,
            height: 0.02,
        }
    }

    #[test]
    fn test_from_fragment_copies_geometry() {
        let annotation = HighlightAnnotation::from_fragment(&fragment(), DEFAULT_HIGHLIGHT_COLOR);
        assert_eq!(annotation.page_number, 3);
        assert_eq!(annotation.x, 0.12);
        assert_eq!(annotation.width, 0.3);
        assert_eq!(annotation.annotation_type, AnnotationType::Highlight);
        assert_eq!(annotation.color, "#ffff00");
        assert_eq!(annotation.source_text.as_deref(), Some("gravity affects"));
    }

    #[test]
    fn test_highlight_serialization() {
        let annotation = HighlightAnnotation::from_fragment(&fragment(), DEFAULT_HIGHLIGHT_COLOR);
        let json = serde_json::to_value(&annotation).unwrap();
        assert_eq!(json["type"], "highlight");
        assert_eq!(json["pageNumber"], 3);
        assert_eq!(json["sourceText"], "gravity affects");
    }

    #[test]
    fn test_annotation_type_matches_stored_name() {
        for kind in [AnnotationType::Highlight, AnnotationType::Circle, AnnotationType::Arrow] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_create_annotation_defaults() {
        let json = r#"{"pageNumber": 2, "x": 0.1, "y": 0.2, "width": 0.3, "height": 0.05}"#;
        let request: CreateAnnotation = serde_json::from_str(json).unwrap();
        assert_eq!(request.annotation_type, AnnotationType::Highlight);
        assert_eq!(request.color_or_default(), "#ffff00");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_annotation_rejects_bad_geometry() {
        let mut request: CreateAnnotation =
            HighlightAnnotation::from_fragment(&fragment(), DEFAULT_HIGHLIGHT_COLOR).into();
        request.x = 1.5;
        assert_eq!(request.validate().unwrap_err(), "x must be between 0 and 1");

        request.x = 0.1;
        request.page_number = 0;
        assert!(request.validate().is_err());
    }
}
