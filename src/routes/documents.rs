//! Document API endpoints
//!
//! - `POST /` upload a PDF, extract its text and fragments
//! - `GET /` list documents
//! - `GET|PATCH|DELETE /:id` fetch, rename or remove a document
//! - `GET /:id/pages/:page/fragments` positioned fragments of one page
//!
//! Uploads are extracted on the blocking pool under a wall-clock budget.
//! Nothing is persisted unless every page extracted successfully.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use serde::{Deserialize, Serialize};

use crate::db::{Document, DocumentRepository, DocumentSummary, FragmentRepository, NewDocument};
use crate::error::{AppError, Result};
use crate::extract::{CancellationToken, Extraction, GlyphExtractor, PositionedFragment};
use crate::state::AppState;

/// Multipart framing allowance on top of the file size limit
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Upload response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub document: DocumentSummary,
    pub fragment_count: usize,
    pub text_length: usize,
}

/// Document list response
#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
    pub total: usize,
}

/// Rename request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameDocument {
    pub original_name: String,
}

/// Fragments of one page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFragmentsResponse {
    pub page_number: u32,
    pub fragments: Vec<PositionedFragment>,
}

/// Create the documents router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents).post(upload_document))
        .route(
            "/:id",
            get(get_document).patch(rename_document).delete(delete_document),
        )
        .route("/:id/pages/:page/fragments", get(get_page_fragments))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read upload: {}", e.body_text()))
    }
}

/// Upload a PDF and extract its text
async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let ingest = &state.config().ingest;

    let mut upload: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(|s| s.to_string())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "document.pdf".to_string());
        let mime_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_default();

        if !ingest.allowed_mime_types.iter().any(|m| *m == mime_type) {
            return Err(AppError::UnsupportedMediaType(format!(
                "Invalid file type '{}'. Only PDF files are allowed.",
                mime_type
            )));
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((original_name, mime_type, data));
        break;
    }

    let (original_name, mime_type, data) =
        upload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }
    if data.len() > ingest.max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File exceeds the {} byte limit",
            ingest.max_upload_bytes
        )));
    }

    tracing::info!("Extracting '{}' ({} bytes)", original_name, data.len());

    let extraction = run_extraction(&state, data.clone()).await?;

    let repo = DocumentRepository::new(state.db());
    let document = repo
        .create_with_fragments(
            &NewDocument {
                original_name,
                mime_type,
                file_size: data.len() as i64,
            },
            &extraction,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            fragment_count: extraction.fragments.len(),
            text_length: extraction.text.full_text.chars().count(),
            document: document.into(),
        }),
    ))
}

/// Extract on the blocking pool, cancelling the extractor when the budget runs out
async fn run_extraction(state: &AppState, data: Bytes) -> Result<Extraction> {
    let timeout_secs = state.config().ingest.extraction_timeout_secs;
    let token = CancellationToken::new();
    let extractor =
        GlyphExtractor::new(state.extractor_config().clone()).with_cancellation(token.clone());
    let decoder = state.decoder_config().clone();

    let task = tokio::task::spawn_blocking(move || extractor.extract_pdf(&data, decoder));

    match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
        Ok(Ok(result)) => Ok(result?),
        Ok(Err(e)) => Err(AppError::Internal(format!("Extraction task failed: {}", e))),
        Err(_) => {
            token.cancel();
            Err(AppError::Timeout(timeout_secs))
        }
    }
}

/// List all documents
async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentListResponse>> {
    let repo = DocumentRepository::new(state.db());
    let documents = repo.list().await?;
    let total = documents.len();

    Ok(Json(DocumentListResponse { documents, total }))
}

/// Get a document with its extracted text
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>> {
    let repo = DocumentRepository::new(state.db());
    let document = repo
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document not found: {}", id)))?;

    Ok(Json(document))
}

/// Rename a document
async fn rename_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(data): Json<RenameDocument>,
) -> Result<Json<DocumentSummary>> {
    let name = data.original_name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("originalName must not be empty".to_string()));
    }

    let repo = DocumentRepository::new(state.db());
    let document = repo
        .rename(&id, name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document not found: {}", id)))?;

    Ok(Json(document.into()))
}

/// Delete a document with its fragments and annotations
async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let repo = DocumentRepository::new(state.db());
    if repo.delete(&id).await? {
        tracing::info!("Deleted document {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Document not found: {}", id)))
    }
}

/// Positioned fragments of one page, in reading order
async fn get_page_fragments(
    State(state): State<AppState>,
    Path((id, page)): Path<(String, u32)>,
) -> Result<Json<PageFragmentsResponse>> {
    let document = DocumentRepository::new(state.db())
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document not found: {}", id)))?;

    if page < 1 || i64::from(page) > document.page_count {
        return Err(AppError::NotFound(format!(
            "Page {} not found (document has {} pages)",
            page, document.page_count
        )));
    }

    let fragments = FragmentRepository::new(state.db())
        .list_for_page(&id, page)
        .await?;

    Ok(Json(PageFragmentsResponse {
        page_number: page,
        fragments,
    }))
}
