//! Document database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::error::Result;
use crate::extract::{Extraction, PositionedFragment};

/// Fragments written per INSERT statement
pub const FRAGMENT_BATCH_SIZE: usize = 1000;

/// Document record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub original_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub page_count: i64,
    pub extracted_text: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Document listing entry, without the full text
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub original_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub page_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Document> for DocumentSummary {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            original_name: doc.original_name,
            file_name: doc.file_name,
            mime_type: doc.mime_type,
            file_size: doc.file_size,
            page_count: doc.page_count,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Upload metadata for a new document
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub original_name: String,
    pub mime_type: String,
    pub file_size: i64,
}

/// Document repository
pub struct DocumentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a document with its full text
    pub async fn get(&self, id: &str) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, original_name, file_name, mime_type, file_size, page_count,
                   extracted_text, created_at, updated_at
            FROM documents
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(document)
    }

    /// List documents, newest first
    pub async fn list(&self) -> Result<Vec<DocumentSummary>> {
        let documents = sqlx::query_as::<_, DocumentSummary>(
            r#"
            SELECT id, original_name, file_name, mime_type, file_size, page_count,
                   created_at, updated_at
            FROM documents
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(documents)
    }

    /// Store a document together with its extracted fragments
    ///
    /// Everything is written in one transaction: either the document and all
    /// of its fragments are visible, or nothing is.
    pub async fn create_with_fragments(
        &self,
        data: &NewDocument,
        extraction: &Extraction,
    ) -> Result<Document> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let file_name = format!("{}.pdf", id);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO documents (id, original_name, file_name, mime_type, file_size,
                                   page_count, extracted_text, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.original_name)
        .bind(&file_name)
        .bind(&data.mime_type)
        .bind(data.file_size)
        .bind(extraction.text.page_count as i64)
        .bind(&extraction.text.full_text)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        for batch in extraction.fragments.chunks(FRAGMENT_BATCH_SIZE) {
            insert_fragment_batch(&mut tx, &id, batch).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Stored document {} ({} pages, {} fragments)",
            id,
            extraction.text.page_count,
            extraction.fragments.len()
        );

        Ok(Document {
            id,
            original_name: data.original_name.clone(),
            file_name,
            mime_type: data.mime_type.clone(),
            file_size: data.file_size,
            page_count: extraction.text.page_count as i64,
            extracted_text: extraction.text.full_text.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Change the display name
    pub async fn rename(&self, id: &str, original_name: &str) -> Result<Option<Document>> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE documents
            SET original_name = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(original_name)
        .bind(&now)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Delete a document; fragments and annotations cascade
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of stored fragments for a document
    pub async fn fragment_count(&self, id: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM text_fragments WHERE document_id = ?")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }
}

async fn insert_fragment_batch(
    tx: &mut Transaction<'_, Sqlite>,
    document_id: &str,
    batch: &[PositionedFragment],
) -> Result<()> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "INSERT INTO text_fragments (document_id, page_number, text, text_folded, x, y, width, height) ",
    );

    builder.push_values(batch, |mut row, fragment| {
        row.push_bind(document_id)
            .push_bind(fragment.page_number as i64)
            .push_bind(&fragment.text)
            .push_bind(fragment.text.to_lowercase())
            .push_bind(fragment.x)
            .push_bind(fragment.y)
            .push_bind(fragment.width)
            .push_bind(fragment.height);
    });

    builder.build().execute(&mut **tx).await?;

    Ok(())
}
