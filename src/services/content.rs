use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{DictionaryEntry, LibraryItem},
    services::stores::ContentStore,
};

/// Dictionary entries sorted by term, narrowed to those matching `query` if given
pub async fn search_dictionary(
    store: &dyn ContentStore,
    query: Option<&str>,
) -> AppResult<Vec<DictionaryEntry>> {
    let entries = store.list_dictionary_entries().await?;

    let filtered: Vec<DictionaryEntry> = match query {
        Some(query) => entries.into_iter().filter(|e| e.matches(query)).collect(),
        None => entries,
    };

    Ok(filtered)
}

/// A single library item, or `NotFound`
pub async fn library_item(store: &dyn ContentStore, id: Uuid) -> AppResult<LibraryItem> {
    store
        .get_library_item(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Library item {} not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stores::MockContentStore;
    use chrono::Utc;

    fn entry(term: &str, definition: &str) -> DictionaryEntry {
        DictionaryEntry {
            id: Uuid::new_v4(),
            term: term.to_string(),
            definition: definition.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_search_matches_term_or_definition() {
        let mut store = MockContentStore::new();
        store.expect_list_dictionary_entries().returning(|| {
            Ok(vec![
                entry("Adaptogen", "A herb said to help the body resist stress"),
                entry("Antioxidant", "Inhibits oxidation"),
                entry("Cortisol", "Primary STRESS hormone"),
            ])
        });

        let found = search_dictionary(&store, Some("stress")).await.unwrap();
        let terms: Vec<&str> = found.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["Adaptogen", "Cortisol"]);
    }

    #[tokio::test]
    async fn test_search_without_query_returns_all() {
        let mut store = MockContentStore::new();
        store
            .expect_list_dictionary_entries()
            .returning(|| Ok(vec![entry("A", "a"), entry("B", "b")]));

        assert_eq!(search_dictionary(&store, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_library_item_is_not_found() {
        let mut store = MockContentStore::new();
        store.expect_get_library_item().returning(|_| Ok(None));

        let err = library_item(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
