//! Route modules for the PDF tutor server

pub mod annotations;
pub mod documents;
pub mod health;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.config().ingest.max_upload_bytes;

    Router::new()
        .nest("/health", health::router())
        .nest("/api/v1/health", health::router())
        .nest(
            "/api/v1/documents",
            documents::router(max_upload_bytes).merge(annotations::router()),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
