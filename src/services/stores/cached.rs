use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{Complaint, Supplement},
};

use super::CatalogStore;

/// Read-through Redis cache in front of another catalog store
///
/// Catalog snapshots change rarely, so both lists are cached whole under a TTL.
pub struct CachedCatalogStore {
    inner: Arc<dyn CatalogStore>,
    cache: Cache,
    ttl_secs: u64,
}

impl CachedCatalogStore {
    pub fn new(inner: Arc<dyn CatalogStore>, cache: Cache, ttl_secs: u64) -> Self {
        Self {
            inner,
            cache,
            ttl_secs,
        }
    }
}

#[async_trait::async_trait]
impl CatalogStore for CachedCatalogStore {
    async fn list_complaints(&self) -> AppResult<Vec<Complaint>> {
        let key = CacheKey::Complaints;
        cached!(self.cache, key, self.ttl_secs, self.inner.list_complaints())
    }

    async fn list_supplements(&self) -> AppResult<Vec<Supplement>> {
        let key = CacheKey::Supplements;
        cached!(self.cache, key, self.ttl_secs, self.inner.list_supplements())
    }
}
