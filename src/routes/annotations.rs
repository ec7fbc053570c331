//! Annotation API endpoints
//!
//! Saved annotations are user or tutor placed regions on a document page.
//! `POST /:id/annotations/resolve` maps a phrase back to highlight regions
//! without saving them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::annotations::{CreateAnnotation, HighlightAnnotation};
use crate::db::{AnnotationRepository, DocumentRepository, SavedAnnotation};
use crate::error::{AppError, Result};
use crate::resolve::ResolveRequest;
use crate::state::AppState;

/// Resolve request body; the document comes from the path
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveBody {
    pub search_text: String,
    pub page_number: Option<u32>,
    pub response_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub annotations: Vec<HighlightAnnotation>,
}

/// Create the annotations router, mounted under the documents prefix
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:id/annotations",
            get(list_annotations).post(create_annotation),
        )
        .route("/:id/annotations/resolve", post(resolve_annotations))
        .route("/:id/annotations/:annotation_id", delete(delete_annotation))
}

async fn ensure_document(state: &AppState, id: &str) -> Result<()> {
    DocumentRepository::new(state.db())
        .get(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Document not found: {}", id)))
}

/// List saved annotations for a document
async fn list_annotations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SavedAnnotation>>> {
    ensure_document(&state, &id).await?;

    let repo = AnnotationRepository::new(state.db());
    let annotations = repo.list_for_document(&id).await?;
    Ok(Json(annotations))
}

/// Save an annotation
async fn create_annotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<CreateAnnotation>,
) -> Result<(StatusCode, Json<SavedAnnotation>)> {
    data.validate().map_err(AppError::BadRequest)?;
    ensure_document(&state, &id).await?;

    let repo = AnnotationRepository::new(state.db());
    let annotation = repo.create(&id, &data).await?;
    Ok((StatusCode::CREATED, Json(annotation)))
}

/// Delete a saved annotation
async fn delete_annotation(
    State(state): State<AppState>,
    Path((id, annotation_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let repo = AnnotationRepository::new(state.db());
    if repo.delete(&id, &annotation_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Annotation not found: {}",
            annotation_id
        )))
    }
}

/// Resolve a phrase to highlight regions
///
/// Always succeeds; an unknown document or phrase yields an empty list.
async fn resolve_annotations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ResolveBody>,
) -> Json<ResolveResponse> {
    let request = ResolveRequest {
        document_id: id,
        search_text: body.search_text,
        page_number: body.page_number,
        response_text: body.response_text,
    };

    let annotations = state.resolver().resolve(&request).await;
    Json(ResolveResponse { annotations })
}
