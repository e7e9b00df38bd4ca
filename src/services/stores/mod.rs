/// Storage collaborators of the mixer
///
/// The engine never talks to storage. Handlers and the submission workflow receive
/// these stores explicitly through `AppState`, so every backend (in-memory, Postgres,
/// PostgREST) is interchangeable and tests can substitute fakes.
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Complaint, DictionaryEntry, LibraryItem, Submission, Supplement},
};

pub mod cached;
pub mod memory;
pub mod postgres;
pub mod records;
pub mod rest;

pub use cached::CachedCatalogStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use rest::RestStore;

/// Read access to complaints and supplements
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// All complaints, sorted by name
    async fn list_complaints(&self) -> AppResult<Vec<Complaint>>;

    /// All supplements, sorted by name. Rows that fail validation are skipped.
    async fn list_supplements(&self) -> AppResult<Vec<Supplement>>;
}

/// Write access to the submission history
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    async fn record_submission(&self, submission: &Submission) -> AppResult<()>;
}

/// Read access to library items and dictionary entries
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Library items, newest first
    async fn list_library_items(&self) -> AppResult<Vec<LibraryItem>>;

    async fn get_library_item(&self, id: Uuid) -> AppResult<Option<LibraryItem>>;

    /// Dictionary entries, sorted by term
    async fn list_dictionary_entries(&self) -> AppResult<Vec<DictionaryEntry>>;
}
