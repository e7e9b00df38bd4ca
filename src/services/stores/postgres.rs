use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Complaint, DictionaryEntry, LibraryItem, Submission, Supplement},
};

use super::records::{
    into_library_items, into_supplements, ComplaintRecord, DictionaryEntryRecord, LibraryItemRecord,
    SupplementRecord,
};
use super::{CatalogStore, ContentStore, HistoryStore};

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgStore {
    async fn list_complaints(&self) -> AppResult<Vec<Complaint>> {
        let rows = sqlx::query_as::<_, ComplaintRecord>(
            r#"
            SELECT id, name, category
            FROM complaints
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Complaint::from).collect())
    }

    async fn list_supplements(&self) -> AppResult<Vec<Supplement>> {
        let rows = sqlx::query_as::<_, SupplementRecord>(
            r#"
            SELECT id, name, description, default_dosage, side_effects, risk_level,
                   contraindications, age_restrictions, indications
            FROM supplements
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let fetched = rows.len();
        let supplements = into_supplements(rows);
        tracing::debug!(fetched, valid = supplements.len(), "Loaded supplements from Postgres");

        Ok(supplements)
    }
}

#[async_trait::async_trait]
impl HistoryStore for PgStore {
    async fn record_submission(&self, submission: &Submission) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO mixer_recommendations
                (id, age, height, weight, complaints, recommendations, risk_accepted, request_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(submission.id)
        .bind(submission.age as i32)
        .bind(submission.height as i32)
        .bind(submission.weight as i32)
        .bind(sqlx::types::Json(&submission.complaints))
        .bind(sqlx::types::Json(&submission.recommendations))
        .bind(submission.risk_accepted)
        .bind(submission.request_id)
        .bind(submission.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl ContentStore for PgStore {
    async fn list_library_items(&self) -> AppResult<Vec<LibraryItem>> {
        let rows = sqlx::query_as::<_, LibraryItemRecord>(
            r#"
            SELECT id, title, description, content_type, file_url, preview_text, created_at
            FROM library_items
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(into_library_items(rows))
    }

    async fn get_library_item(&self, id: Uuid) -> AppResult<Option<LibraryItem>> {
        let row = sqlx::query_as::<_, LibraryItemRecord>(
            r#"
            SELECT id, title, description, content_type, file_url, preview_text, created_at
            FROM library_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|row| into_library_items(vec![row]).pop()))
    }

    async fn list_dictionary_entries(&self) -> AppResult<Vec<DictionaryEntry>> {
        let rows = sqlx::query_as::<_, DictionaryEntryRecord>(
            r#"
            SELECT id, term, definition, created_at
            FROM dictionary_entries
            ORDER BY term ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DictionaryEntry::from).collect())
    }
}
