//! Annotation resolver
//!
//! Maps a text reference back to highlight rectangles using the stored
//! fragment geometry. Resolution is best effort: a failing store yields no
//! highlights rather than an error.

use serde::{Deserialize, Serialize};

use crate::annotations::{HighlightAnnotation, DEFAULT_HIGHLIGHT_COLOR};

use super::key_phrases::{extract_key_phrases, page_references};
use super::store::{FragmentQuery, FragmentStore};

/// Resolver limits
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Matches kept for the literal search phrase
    pub per_query_limit: usize,
    /// Key phrases searched when the literal phrase finds nothing
    pub fallback_key_phrases: usize,
    /// Candidate key phrases collected from a response
    pub max_key_phrase_candidates: usize,
    /// Matches kept per (key phrase, page) pair
    pub per_phrase_page_limit: usize,
    /// Total highlights returned
    pub total_limit: usize,
    /// Highlight color
    pub color: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            per_query_limit: 5,
            fallback_key_phrases: 3,
            max_key_phrase_candidates: 10,
            per_phrase_page_limit: 2,
            total_limit: 10,
            color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
        }
    }
}

/// A request to place highlights for a phrase
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub document_id: String,
    pub search_text: String,
    /// Restrict the literal search to one page
    #[serde(default)]
    pub page_number: Option<u32>,
    /// Full tutor response, enables the broadening pass
    #[serde(default)]
    pub response_text: Option<String>,
}

/// Resolves phrases to highlight annotations over a [`FragmentStore`]
#[derive(Debug, Clone)]
pub struct AnnotationResolver<S> {
    store: S,
    config: ResolverConfig,
}

impl<S: FragmentStore> AnnotationResolver<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, ResolverConfig::default())
    }

    pub fn with_config(store: S, config: ResolverConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a request to at most `total_limit` highlights
    ///
    /// The literal phrase is tried first. Only when it matches nothing and a
    /// response text is present are key phrases from the response searched
    /// on the referenced pages. An empty result is a normal outcome.
    pub async fn resolve(&self, request: &ResolveRequest) -> Vec<HighlightAnnotation> {
        let search_text = request.search_text.trim();

        let mut annotations = if search_text.is_empty() {
            Vec::new()
        } else {
            self.lookup(
                &request.document_id,
                search_text,
                request.page_number,
                self.config.per_query_limit,
            )
            .await
        };

        if annotations.is_empty() {
            if let Some(response) = request.response_text.as_deref() {
                annotations = self.broaden(request, response).await;
            }
        }

        annotations.truncate(self.config.total_limit);

        tracing::debug!(
            "Resolved {} highlights for '{}' in document {}",
            annotations.len(),
            search_text,
            request.document_id
        );

        annotations
    }

    /// Search key phrases from the response on every referenced page
    async fn broaden(&self, request: &ResolveRequest, response: &str) -> Vec<HighlightAnnotation> {
        let phrases: Vec<String> =
            extract_key_phrases(response, self.config.max_key_phrase_candidates)
                .into_iter()
                .take(self.config.fallback_key_phrases)
                .collect();

        let mut pages: Vec<Option<u32>> = request.page_number.into_iter().map(Some).collect();
        for page in page_references(response) {
            if !pages.contains(&Some(page)) {
                pages.push(Some(page));
            }
        }
        if pages.is_empty() {
            pages.push(None);
        }

        tracing::debug!(
            "Broadening search with {} phrases over {} page scopes",
            phrases.len(),
            pages.len()
        );

        let mut annotations: Vec<HighlightAnnotation> = Vec::new();

        'phrases: for phrase in &phrases {
            for page in &pages {
                if annotations.len() >= self.config.total_limit {
                    break 'phrases;
                }

                let found = self
                    .lookup(
                        &request.document_id,
                        phrase,
                        *page,
                        self.config.per_phrase_page_limit,
                    )
                    .await;

                for annotation in found {
                    if !annotations.iter().any(|a| same_region(a, &annotation)) {
                        annotations.push(annotation);
                    }
                }
            }
        }

        annotations
    }

    async fn lookup(
        &self,
        document_id: &str,
        needle: &str,
        page_number: Option<u32>,
        limit: usize,
    ) -> Vec<HighlightAnnotation> {
        let query = FragmentQuery {
            document_id: document_id.to_string(),
            needle: needle.to_string(),
            page_number,
            limit,
        };

        match self.store.find_fragments(&query).await {
            Ok(fragments) => fragments
                .iter()
                .take(limit)
                .map(|f| HighlightAnnotation::from_fragment(f, &self.config.color))
                .collect(),
            Err(e) => {
                tracing::warn!(
                    "Fragment lookup failed for document {}: {}. Returning no highlights",
                    document_id,
                    e
                );
                Vec::new()
            }
        }
    }
}

fn same_region(a: &HighlightAnnotation, b: &HighlightAnnotation) -> bool {
    a.page_number == b.page_number
        && a.x == b.x
        && a.y == b.y
        && a.width == b.width
        && a.height == b.height
}
