//! Annotation model
//!
//! Resolver output ([`HighlightAnnotation`]) and the request type used when a
//! user keeps one ([`CreateAnnotation`]).

mod types;

pub use types::{AnnotationType, CreateAnnotation, HighlightAnnotation, DEFAULT_HIGHLIGHT_COLOR};
