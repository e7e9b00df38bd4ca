use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Complaint, DictionaryEntry, LibraryItem, Submission, Supplement},
};

use super::records::{
    into_library_items, into_supplements, ComplaintRecord, DictionaryEntryRecord, LibraryItemRecord,
    SupplementRecord,
};
use super::{CatalogStore, ContentStore, HistoryStore};

/// Store backed by a PostgREST endpoint (e.g. a hosted Supabase project)
///
/// Tables are addressed as `{base_url}/rest/v1/{table}`; the API key is sent both
/// as `apikey` and as a bearer token.
#[derive(Clone)]
pub struct RestStore {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Runs `GET /rest/v1/{table}` with the given PostgREST query parameters
    async fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, &str)]) -> AppResult<Vec<T>> {
        let request = self
            .authorized(self.http_client.get(self.table_url(table)))
            .query(&[("select", "*")])
            .query(query);

        let response = check_status(table, request.send().await?).await?;
        let rows: Vec<T> = response.json().await?;

        tracing::debug!(table = %table, rows = rows.len(), "Fetched rows from REST store");

        Ok(rows)
    }
}

/// Turns non-success responses into `ExternalApi` errors carrying the body
async fn check_status(table: &str, response: Response) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(
        table = %table,
        status = %status,
        body = %body,
        "REST store request failed"
    );
    Err(AppError::ExternalApi(format!(
        "REST store returned status {}: {}",
        status, body
    )))
}

#[async_trait::async_trait]
impl CatalogStore for RestStore {
    async fn list_complaints(&self) -> AppResult<Vec<Complaint>> {
        let rows: Vec<ComplaintRecord> = self.select("complaints", &[("order", "name.asc")]).await?;
        Ok(rows.into_iter().map(Complaint::from).collect())
    }

    async fn list_supplements(&self) -> AppResult<Vec<Supplement>> {
        let rows: Vec<SupplementRecord> = self.select("supplements", &[("order", "name.asc")]).await?;
        Ok(into_supplements(rows))
    }
}

#[async_trait::async_trait]
impl HistoryStore for RestStore {
    async fn record_submission(&self, submission: &Submission) -> AppResult<()> {
        let table = "mixer_recommendations";
        let body = json!({
            "id": submission.id,
            "age": submission.age,
            "height": submission.height,
            "weight": submission.weight,
            "complaints": submission.complaints,
            "recommendations": submission.recommendations,
            "risk_accepted": submission.risk_accepted,
            "request_id": submission.request_id,
            "created_at": submission.created_at,
        });

        let request = self
            .authorized(self.http_client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(&body);

        check_status(table, request.send().await?).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ContentStore for RestStore {
    async fn list_library_items(&self) -> AppResult<Vec<LibraryItem>> {
        let rows: Vec<LibraryItemRecord> = self
            .select("library_items", &[("order", "created_at.desc")])
            .await?;
        Ok(into_library_items(rows))
    }

    async fn get_library_item(&self, id: Uuid) -> AppResult<Option<LibraryItem>> {
        let filter = format!("eq.{}", id);
        let rows: Vec<LibraryItemRecord> = self
            .select("library_items", &[("id", filter.as_str()), ("limit", "1")])
            .await?;
        Ok(into_library_items(rows).pop())
    }

    async fn list_dictionary_entries(&self) -> AppResult<Vec<DictionaryEntry>> {
        let rows: Vec<DictionaryEntryRecord> = self
            .select("dictionary_entries", &[("order", "term.asc")])
            .await?;
        Ok(rows.into_iter().map(DictionaryEntry::from).collect())
    }
}
