//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::db::SqliteFragmentStore;
use crate::extract::ExtractorConfig;
use crate::pdf::DecoderConfig;
use crate::resolve::{AnnotationResolver, ResolverConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    extractor: ExtractorConfig,
    decoder: DecoderConfig,
    resolver: AnnotationResolver<SqliteFragmentStore>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config, db: SqlitePool) -> Self {
        Self::with_resolver_config(config, db, ResolverConfig::default())
    }

    /// Create state with custom resolver limits
    pub fn with_resolver_config(config: Config, db: SqlitePool, resolver: ResolverConfig) -> Self {
        let extractor = ExtractorConfig {
            max_full_text_chars: config.ingest.max_extracted_text_chars,
            ..ExtractorConfig::default()
        };
        let resolver = AnnotationResolver::with_config(SqliteFragmentStore::new(db.clone()), resolver);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                extractor,
                decoder: DecoderConfig::default(),
                resolver,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the extractor settings
    pub fn extractor_config(&self) -> &ExtractorConfig {
        &self.inner.extractor
    }

    /// Get the PDF decoder settings
    pub fn decoder_config(&self) -> &DecoderConfig {
        &self.inner.decoder
    }

    /// Get the annotation resolver
    pub fn resolver(&self) -> &AnnotationResolver<SqliteFragmentStore> {
        &self.inner.resolver
    }
}
