//! HTTP API tests

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{memory_pool, minimal_pdf, multipart_body, physics_extraction, test_config};
use pdf_tutor_server::config::Config;
use pdf_tutor_server::db::{DocumentRepository, NewDocument};
use pdf_tutor_server::routes;
use pdf_tutor_server::state::AppState;

const BOUNDARY: &str = "pdf-tutor-test-boundary";

async fn state_with(config: Config) -> AppState {
    AppState::new(config, memory_pool().await)
}

async fn seeded_state() -> (AppState, String) {
    let state = state_with(test_config()).await;
    let doc = DocumentRepository::new(state.db())
        .create_with_fragments(
            &NewDocument {
                original_name: "physics.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                file_size: 2048,
            },
            &physics_extraction(),
        )
        .await
        .unwrap();
    (state, doc.id)
}

async fn upload(app: Router, file_name: &str, content_type: &str, data: &[u8]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/documents")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(BOUNDARY, file_name, content_type, data)))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::new(routes::app(state_with(test_config()).await)).unwrap();

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_upload_extracts_and_persists() {
    let state = state_with(test_config()).await;
    let pdf = minimal_pdf(&["Gravity pulls objects down", "Newton described motion"]);

    let (status, body) = upload(routes::app(state.clone()), "notes.pdf", "application/pdf", &pdf).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["document"]["originalName"], "notes.pdf");
    assert_eq!(body["document"]["pageCount"], 1);
    assert!(body["fragmentCount"].as_u64().unwrap() >= 2);

    let id = body["document"]["id"].as_str().unwrap().to_string();
    let server = TestServer::new(routes::app(state)).unwrap();

    let document = server.get(&format!("/api/v1/documents/{}", id)).await;
    assert_eq!(document.status_code(), StatusCode::OK);
    let text = document.json::<Value>()["extractedText"]
        .as_str()
        .unwrap()
        .to_string();
    let gravity = text.find("Gravity").unwrap();
    let newton = text.find("Newton").unwrap();
    assert!(gravity < newton);

    let page = server
        .get(&format!("/api/v1/documents/{}/pages/1/fragments", id))
        .await;
    assert_eq!(page.status_code(), StatusCode::OK);
    let fragments = page.json::<Value>()["fragments"].as_array().unwrap().clone();
    assert!(!fragments.is_empty());
    for fragment in &fragments {
        for key in ["x", "y", "width", "height"] {
            let value = fragment[key].as_f64().unwrap();
            assert!((0.0..=1.0).contains(&value), "{} out of range: {}", key, value);
        }
    }

    let resolved = server
        .post(&format!("/api/v1/documents/{}/annotations/resolve", id))
        .json(&json!({ "searchText": "gravity" }))
        .await;
    assert_eq!(resolved.status_code(), StatusCode::OK);
    let annotations = resolved.json::<Value>()["annotations"].as_array().unwrap().clone();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0]["pageNumber"], 1);
    assert_eq!(annotations[0]["type"], "highlight");
}

#[tokio::test]
async fn test_upload_rejects_non_pdf_type() {
    let state = state_with(test_config()).await;

    let (status, body) = upload(routes::app(state.clone()), "notes.txt", "text/plain", b"hello").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"], "unsupported_media_type");

    let list = DocumentRepository::new(state.db()).list().await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_upload_rejects_oversized_file() {
    let mut config = test_config();
    config.ingest.max_upload_bytes = 1024;
    let state = state_with(config).await;

    let (status, body) = upload(routes::app(state), "big.pdf", "application/pdf", &[b'%'; 4096]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "payload_too_large");
}

#[tokio::test]
async fn test_corrupt_pdf_is_unprocessable_and_not_stored() {
    let state = state_with(test_config()).await;

    let (status, body) = upload(
        routes::app(state.clone()),
        "broken.pdf",
        "application/pdf",
        b"this is not a pdf at all",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "extraction_failed");
    assert_eq!(body["message"], "Could not process PDF");

    let list = DocumentRepository::new(state.db()).list().await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let state = state_with(test_config()).await;
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nNotes\r\n--{b}--\r\n",
        b = BOUNDARY
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/documents")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = routes::app(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_document_crud() {
    let (state, id) = seeded_state().await;
    let server = TestServer::new(routes::app(state)).unwrap();

    let list = server.get("/api/v1/documents").await;
    assert_eq!(list.status_code(), StatusCode::OK);
    assert_eq!(list.json::<Value>()["total"], 1);

    let renamed = server
        .patch(&format!("/api/v1/documents/{}", id))
        .json(&json!({ "originalName": "Mechanics" }))
        .await;
    assert_eq!(renamed.status_code(), StatusCode::OK);
    assert_eq!(renamed.json::<Value>()["originalName"], "Mechanics");

    let blank = server
        .patch(&format!("/api/v1/documents/{}", id))
        .json(&json!({ "originalName": "  " }))
        .await;
    assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);

    let missing_page = server
        .get(&format!("/api/v1/documents/{}/pages/9/fragments", id))
        .await;
    assert_eq!(missing_page.status_code(), StatusCode::NOT_FOUND);

    let deleted = server.delete(&format!("/api/v1/documents/{}", id)).await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let gone = server.get(&format!("/api/v1/documents/{}", id)).await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(gone.json::<Value>()["error"], "not_found");
}

#[tokio::test]
async fn test_resolve_endpoint() {
    let (state, id) = seeded_state().await;
    let server = TestServer::new(routes::app(state)).unwrap();
    let path = format!("/api/v1/documents/{}/annotations/resolve", id);

    let hit = server.post(&path).json(&json!({ "searchText": "gravity" })).await;
    assert_eq!(hit.status_code(), StatusCode::OK);
    let annotations = hit.json::<Value>()["annotations"].as_array().unwrap().clone();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0]["pageNumber"], 3);
    assert_eq!(annotations[0]["color"], "#ffff00");

    let miss = server.post(&path).json(&json!({ "searchText": "thermodynamics" })).await;
    assert_eq!(miss.status_code(), StatusCode::OK);
    assert!(miss.json::<Value>()["annotations"].as_array().unwrap().is_empty());

    let broadened = server
        .post(&path)
        .json(&json!({
            "searchText": "inertia principle",
            "responseText": "On page 3 the text says \"objects at rest\" stay there."
        }))
        .await;
    let annotations = broadened.json::<Value>()["annotations"].as_array().unwrap().clone();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0]["sourceText"], "objects at rest remain at rest");

    let unknown = server
        .post("/api/v1/documents/unknown/annotations/resolve")
        .json(&json!({ "searchText": "gravity" }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::OK);
    assert!(unknown.json::<Value>()["annotations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_saved_annotations() {
    let (state, id) = seeded_state().await;
    let server = TestServer::new(routes::app(state)).unwrap();
    let path = format!("/api/v1/documents/{}/annotations", id);

    let created = server
        .post(&path)
        .json(&json!({
            "pageNumber": 2,
            "x": 0.1,
            "y": 0.2,
            "width": 0.3,
            "height": 0.05,
            "type": "circle"
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let saved = created.json::<Value>();
    assert_eq!(saved["type"], "circle");
    assert_eq!(saved["color"], "#ffff00");

    let invalid = server
        .post(&path)
        .json(&json!({ "pageNumber": 1, "x": 1.5, "y": 0.2, "width": 0.3, "height": 0.05 }))
        .await;
    assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

    let listed = server.get(&path).await;
    assert_eq!(listed.status_code(), StatusCode::OK);
    assert_eq!(listed.json::<Value>().as_array().unwrap().len(), 1);

    let annotation_id = saved["id"].as_str().unwrap();
    let deleted = server.delete(&format!("{}/{}", path, annotation_id)).await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let again = server.delete(&format!("{}/{}", path, annotation_id)).await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);

    let unknown_doc = server.get("/api/v1/documents/unknown/annotations").await;
    assert_eq!(unknown_doc.status_code(), StatusCode::NOT_FOUND);
}
