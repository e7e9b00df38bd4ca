pub mod postgres;
pub mod redis;

pub use postgres::create_pool;
pub use redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
