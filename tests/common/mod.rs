//! Shared helpers for integration tests

#![allow(dead_code)]

use sqlx::SqlitePool;

use pdf_tutor_server::config::Config;
use pdf_tutor_server::db;
use pdf_tutor_server::extract::{ExtractedDocumentText, Extraction, PositionedFragment};

/// Single-connection in-memory database with the schema applied
pub async fn memory_pool() -> SqlitePool {
    db::create_pool("sqlite::memory:", 1)
        .await
        .expect("in-memory pool")
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.database.max_connections = 1;
    config.ingest.extraction_timeout_secs = 30;
    config
}

pub fn fragment(text: &str, page_number: u32, x: f64, y: f64) -> PositionedFragment {
    PositionedFragment {
        text: text.to_string(),
        page_number,
        x,
        y,
        width: 0.3,
        height: 0.02,
    }
}

/// Hand-built extraction for a short physics text
pub fn physics_extraction() -> Extraction {
    Extraction {
        text: ExtractedDocumentText {
            page_count: 4,
            full_text: "Introduction to mechanics\n\nForces and motion\n\n...gravity affects...\nobjects at rest remain at rest\n\nNewton's first law".to_string(),
        },
        fragments: vec![
            fragment("Introduction to mechanics", 1, 0.1, 0.1),
            fragment("Forces and motion", 2, 0.1, 0.1),
            fragment("...gravity affects...", 3, 0.1, 0.2),
            fragment("objects at rest remain at rest", 3, 0.1, 0.4),
            fragment("Newton's first law", 4, 0.1, 0.1),
        ],
    }
}

/// A one-page PDF drawing each line in Helvetica 12pt, 20pt apart
pub fn minimal_pdf(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 12 Tf\n72 720 Td\n");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.push_str("0 -20 Td\n");
        }
        content.push_str(&format!("({}) Tj\n", line));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    pdf.push_str("0000000000 65535 f \n");
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    pdf.into_bytes()
}

/// multipart/form-data body with a single `file` part
pub fn multipart_body(boundary: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
