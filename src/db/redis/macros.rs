/// Read-through caching over a [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` if present. Otherwise awaits `$block`,
/// queues the result with `set_in_background` under `$ttl` seconds, and returns it.
/// A failed cache read is logged and served straight from `$block`.
///
/// ```rust,ignore
/// async fn list_complaints(&self) -> AppResult<Vec<Complaint>> {
///     cached!(self.cache, CacheKey::Complaints, self.ttl_secs, self.inner.list_complaints())
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(cached)
            }
            Ok(None) => {
                tracing::debug!(key = %$key, "Cache miss");
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(key = %$key, error = %e, "Cache read failed, bypassing cache");
                $block.await
            }
        }
    }};
}
