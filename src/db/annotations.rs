//! Saved annotation operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::annotations::CreateAnnotation;
use crate::error::Result;

/// Annotation record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavedAnnotation {
    pub id: String,
    pub document_id: String,
    pub page_number: i64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub annotation_type: String,
    pub color: String,
    pub text: Option<String>,
    pub created_at: String,
}

/// Annotation repository
pub struct AnnotationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnnotationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List annotations for a document, by page then creation time
    pub async fn list_for_document(&self, document_id: &str) -> Result<Vec<SavedAnnotation>> {
        let annotations = sqlx::query_as::<_, SavedAnnotation>(
            r#"
            SELECT id, document_id, page_number, x, y, width, height, type, color, text, created_at
            FROM annotations
            WHERE document_id = ?
            ORDER BY page_number ASC, created_at ASC
            "#,
        )
        .bind(document_id)
        .fetch_all(self.pool)
        .await?;

        Ok(annotations)
    }

    /// Save a validated annotation
    pub async fn create(
        &self,
        document_id: &str,
        data: &CreateAnnotation,
    ) -> Result<SavedAnnotation> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let color = data.color_or_default().to_string();

        sqlx::query(
            r#"
            INSERT INTO annotations (id, document_id, page_number, x, y, width, height, type, color, text, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(document_id)
        .bind(data.page_number as i64)
        .bind(data.x)
        .bind(data.y)
        .bind(data.width)
        .bind(data.height)
        .bind(data.annotation_type.as_str())
        .bind(&color)
        .bind(&data.text)
        .bind(&now)
        .execute(self.pool)
        .await?;

        Ok(SavedAnnotation {
            id,
            document_id: document_id.to_string(),
            page_number: data.page_number as i64,
            x: data.x,
            y: data.y,
            width: data.width,
            height: data.height,
            annotation_type: data.annotation_type.as_str().to_string(),
            color,
            text: data.text.clone(),
            created_at: now,
        })
    }

    /// Delete an annotation belonging to a document
    pub async fn delete(&self, document_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = ? AND document_id = ?")
            .bind(id)
            .bind(document_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
