//! Fragment store boundary
//!
//! The resolver reads persisted fragments through [`FragmentStore`]. The
//! SQLite implementation lives in `db`; [`MemoryFragmentStore`] keeps
//! fragments in process.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::extract::PositionedFragment;

/// Fragment lookup failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Fragment store unavailable: {0}")]
    Unavailable(String),
}

/// Case-insensitive substring lookup scoped to one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentQuery {
    pub document_id: String,
    /// Substring to look for in fragment text
    pub needle: String,
    /// Restrict to one page when set
    pub page_number: Option<u32>,
    /// Maximum fragments to return
    pub limit: usize,
}

/// Read access to persisted fragments
#[async_trait]
pub trait FragmentStore: Send + Sync {
    /// Fragments whose text contains `query.needle`, ignoring case, in the
    /// order they were stored
    async fn find_fragments(
        &self,
        query: &FragmentQuery,
    ) -> Result<Vec<PositionedFragment>, StoreError>;
}

#[async_trait]
impl<T: FragmentStore + ?Sized> FragmentStore for std::sync::Arc<T> {
    async fn find_fragments(
        &self,
        query: &FragmentQuery,
    ) -> Result<Vec<PositionedFragment>, StoreError> {
        (**self).find_fragments(query).await
    }
}

/// In-process fragment store keyed by document id
#[derive(Debug, Clone, Default)]
pub struct MemoryFragmentStore {
    documents: HashMap<String, Vec<PositionedFragment>>,
}

impl MemoryFragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the fragments for a document, replacing any previous set
    pub fn insert(&mut self, document_id: impl Into<String>, fragments: Vec<PositionedFragment>) {
        self.documents.insert(document_id.into(), fragments);
    }
}

#[async_trait]
impl FragmentStore for MemoryFragmentStore {
    async fn find_fragments(
        &self,
        query: &FragmentQuery,
    ) -> Result<Vec<PositionedFragment>, StoreError> {
        let Some(fragments) = self.documents.get(&query.document_id) else {
            return Ok(Vec::new());
        };
        if query.needle.is_empty() {
            return Ok(Vec::new());
        }
        let needle = query.needle.to_lowercase();

        Ok(fragments
            .iter()
            .filter(|f| query.page_number.map_or(true, |p| f.page_number == p))
            .filter(|f| f.text.to_lowercase().contains(&needle))
            .take(query.limit)
            .cloned()
            .collect())
    }
}
