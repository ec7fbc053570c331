//! Text fragment queries

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::extract::PositionedFragment;
use crate::resolve::{FragmentQuery, FragmentStore, StoreError};

#[derive(Debug, sqlx::FromRow)]
struct FragmentRow {
    page_number: i64,
    text: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<FragmentRow> for PositionedFragment {
    fn from(row: FragmentRow) -> Self {
        PositionedFragment {
            text: row.text,
            page_number: row.page_number.max(0) as u32,
            x: row.x,
            y: row.y,
            width: row.width,
            height: row.height,
        }
    }
}

/// Read-only fragment repository
pub struct FragmentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FragmentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All fragments of one page in reading order
    pub async fn list_for_page(
        &self,
        document_id: &str,
        page_number: u32,
    ) -> Result<Vec<PositionedFragment>> {
        let rows = sqlx::query_as::<_, FragmentRow>(
            r#"
            SELECT page_number, text, x, y, width, height
            FROM text_fragments
            WHERE document_id = ? AND page_number = ?
            ORDER BY id ASC
            "#,
        )
        .bind(document_id)
        .bind(page_number as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

async fn find(
    pool: &SqlitePool,
    query: &FragmentQuery,
) -> std::result::Result<Vec<PositionedFragment>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FragmentRow>(
        r#"
        SELECT page_number, text, x, y, width, height
        FROM text_fragments
        WHERE document_id = ?
          AND instr(text_folded, ?) > 0
          AND (? IS NULL OR page_number = ?)
        ORDER BY id ASC
        LIMIT ?
        "#,
    )
    .bind(&query.document_id)
    .bind(query.needle.to_lowercase())
    .bind(query.page_number.map(i64::from))
    .bind(query.page_number.map(i64::from))
    .bind(query.limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// [`FragmentStore`] backed by the `text_fragments` table
#[derive(Debug, Clone)]
pub struct SqliteFragmentStore {
    pool: SqlitePool,
}

impl SqliteFragmentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FragmentStore for SqliteFragmentStore {
    async fn find_fragments(
        &self,
        query: &FragmentQuery,
    ) -> std::result::Result<Vec<PositionedFragment>, StoreError> {
        if query.needle.is_empty() || query.limit == 0 {
            return Ok(Vec::new());
        }

        Ok(find(&self.pool, query).await?)
    }
}
