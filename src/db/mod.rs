pub mod postgres;
pub mod redis;
pub mod watch_records;

pub use postgres::create_pool;
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use redis::CacheWriterHandle;
pub use watch_records::{PgWatchRepository, WatchRepository};

#[cfg(test)]
pub use watch_records::MockWatchRepository;
