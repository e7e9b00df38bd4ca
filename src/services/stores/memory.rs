use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Complaint, DictionaryEntry, LibraryItem, Submission, Supplement},
};

use super::{
    records::{into_library_items, into_supplements, LibraryItemRecord, SupplementRecord},
    CatalogStore, ContentStore, HistoryStore,
};

/// Seed file layout for the in-memory backend.
///
/// Supplements and library items are read as raw rows and validated like any
/// other backend, so one malformed row is skipped instead of failing the file.
#[derive(Debug, Default, Deserialize)]
pub struct MemorySeed {
    #[serde(default)]
    pub complaints: Vec<Complaint>,
    #[serde(default)]
    pub supplements: Vec<SupplementRecord>,
    #[serde(default)]
    pub library_items: Vec<LibraryItemRecord>,
    #[serde(default)]
    pub dictionary_entries: Vec<DictionaryEntry>,
}

#[derive(Default)]
struct MemoryData {
    complaints: Vec<Complaint>,
    supplements: Vec<Supplement>,
    library_items: Vec<LibraryItem>,
    dictionary_entries: Vec<DictionaryEntry>,
    submissions: Vec<Submission>,
}

/// Process-local store backing every store trait. Used for development and tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: MemorySeed) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryData {
                complaints: seed.complaints,
                supplements: into_supplements(seed.supplements),
                library_items: into_library_items(seed.library_items),
                dictionary_entries: seed.dictionary_entries,
                submissions: Vec::new(),
            })),
        }
    }

    /// Loads a JSON seed file (`complaints`, `supplements`, `library_items`, `dictionary_entries`)
    pub async fn from_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let seed: MemorySeed = serde_json::from_str(&raw)?;
        tracing::info!(
            path = %path.as_ref().display(),
            complaints = seed.complaints.len(),
            supplements = seed.supplements.len(),
            "Loaded memory store seed"
        );
        Ok(Self::from_seed(seed))
    }

    pub async fn add_complaint(&self, complaint: Complaint) {
        self.inner.write().await.complaints.push(complaint);
    }

    pub async fn add_supplement(&self, supplement: Supplement) {
        self.inner.write().await.supplements.push(supplement);
    }

    pub async fn add_library_item(&self, item: LibraryItem) {
        self.inner.write().await.library_items.push(item);
    }

    pub async fn add_dictionary_entry(&self, entry: DictionaryEntry) {
        self.inner.write().await.dictionary_entries.push(entry);
    }

    /// Submissions recorded so far, oldest first
    pub async fn submissions(&self) -> Vec<Submission> {
        self.inner.read().await.submissions.clone()
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn list_complaints(&self) -> AppResult<Vec<Complaint>> {
        let mut complaints = self.inner.read().await.complaints.clone();
        complaints.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(complaints)
    }

    async fn list_supplements(&self) -> AppResult<Vec<Supplement>> {
        let mut supplements = self.inner.read().await.supplements.clone();
        supplements.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(supplements)
    }
}

#[async_trait::async_trait]
impl HistoryStore for MemoryStore {
    async fn record_submission(&self, submission: &Submission) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.submissions.iter().any(|s| s.id == submission.id) {
            return Err(AppError::InvalidInput(format!(
                "Submission {} already recorded",
                submission.id
            )));
        }
        inner.submissions.push(submission.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryStore {
    async fn list_library_items(&self) -> AppResult<Vec<LibraryItem>> {
        let mut items = self.inner.read().await.library_items.clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn get_library_item(&self, id: Uuid) -> AppResult<Option<LibraryItem>> {
        let inner = self.inner.read().await;
        Ok(inner.library_items.iter().find(|item| item.id == id).cloned())
    }

    async fn list_dictionary_entries(&self) -> AppResult<Vec<DictionaryEntry>> {
        let mut entries = self.inner.read().await.dictionary_entries.clone();
        entries.sort_by(|a, b| a.term.cmp(&b.term));
        Ok(entries)
    }
}
