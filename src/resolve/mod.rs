//! Annotation resolution
//!
//! Given a document's persisted fragments and a phrase, find the fragment
//! rectangles to highlight. Matching is a plain case-insensitive substring
//! test; results keep store order.

mod key_phrases;
mod resolver;
mod store;

pub use key_phrases::{extract_key_phrases, page_references};
pub use resolver::{AnnotationResolver, ResolveRequest, ResolverConfig};
pub use store::{FragmentQuery, FragmentStore, MemoryFragmentStore, StoreError};
