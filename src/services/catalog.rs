use crate::{models::Catalog, services::stores::CatalogStore};

/// Loads complaints and supplements concurrently into a catalog snapshot.
///
/// A failing read degrades to an empty list so the mixer renders
/// "nothing available" instead of failing.
pub async fn load_catalog(store: &dyn CatalogStore) -> Catalog {
    let (complaints, supplements) = tokio::join!(store.list_complaints(), store.list_supplements());

    let complaints = complaints.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Complaint catalog unavailable, continuing with none");
        Vec::new()
    });
    let supplements = supplements.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Supplement catalog unavailable, continuing with none");
        Vec::new()
    });

    tracing::debug!(
        complaints = complaints.len(),
        supplements = supplements.len(),
        "Catalog loaded"
    );

    Catalog::new(complaints, supplements)
}
