use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::{MediaKind, MediaScope, TimeWindow};

/// Keys for cached catalog responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Search(String),
    Details(MediaKind, i64),
    Similar(MediaKind, i64),
    Trending(MediaScope, TimeWindow),
    Discover {
        kind: MediaKind,
        genre_ids: Vec<u32>,
        year: Option<i32>,
    },
    GenreMapping,
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Search(query) => write!(f, "search:{}", query.trim().to_lowercase()),
            CacheKey::Details(kind, id) => write!(f, "details:{}:{}", kind, id),
            CacheKey::Similar(kind, id) => write!(f, "similar:{}:{}", kind, id),
            CacheKey::Trending(scope, window) => {
                write!(f, "trending:{}:{}", scope.as_str(), window.as_str())
            }
            CacheKey::Discover {
                kind,
                genre_ids,
                year,
            } => {
                let genres = genre_ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                match year {
                    Some(year) => write!(f, "discover:{}:{}:{}", kind, genres, year),
                    None => write!(f, "discover:{}:{}:*", kind, genres),
                }
            }
            CacheKey::GenreMapping => write!(f, "genres"),
        }
    }
}

/// Creates a Redis client for caching
///
/// Opening the client does not connect; connections are made on first use.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through cache for catalog responses backed by Redis
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a new Cache and spawns its background writer task
    ///
    /// Writes are queued on a channel so a slow or unreachable Redis never
    /// delays a catalog response.
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// Drains write messages into Redis until shutdown, then flushes the rest
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut conn: Option<ConnectionManager> = None;
        let mut failed_writes = 0u64;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, &mut conn, msg).await {
                        failed_writes += 1;
                        tracing::warn!(error = %e, failed_writes, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    write_rx.close();
                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, &mut conn, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!(failed_writes, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    /// Writes a single message, connecting lazily and reconnecting after failures
    async fn write_to_redis(
        client: &Client,
        conn: &mut Option<ConnectionManager>,
        msg: CacheWriteMessage,
    ) -> AppResult<()> {
        if conn.is_none() {
            *conn = Some(client.get_connection_manager().await?);
        }

        if let Some(manager) = conn.as_mut() {
            let result: redis::RedisResult<()> = manager.set_ex(msg.key, msg.value, msg.ttl).await;
            if let Err(e) = result {
                *conn = None;
                return Err(e.into());
            }
        }

        Ok(())
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a value for storage without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_search_is_normalized() {
        let key = CacheKey::Search("  The MATRIX ".to_string());
        assert_eq!(key.to_string(), "search:the matrix");
    }

    #[test]
    fn test_cache_key_details_and_similar() {
        assert_eq!(
            CacheKey::Details(MediaKind::Movie, 603).to_string(),
            "details:movie:603"
        );
        assert_eq!(
            CacheKey::Similar(MediaKind::Series, 1396).to_string(),
            "similar:series:1396"
        );
    }

    #[test]
    fn test_cache_key_trending() {
        let key = CacheKey::Trending(MediaScope::All, TimeWindow::Week);
        assert_eq!(key.to_string(), "trending:all:week");
    }

    #[test]
    fn test_cache_key_discover_with_and_without_year() {
        let key = CacheKey::Discover {
            kind: MediaKind::Movie,
            genre_ids: vec![28, 12],
            year: None,
        };
        assert_eq!(key.to_string(), "discover:movie:28,12:*");

        let key = CacheKey::Discover {
            kind: MediaKind::Series,
            genre_ids: vec![18],
            year: Some(2019),
        };
        assert_eq!(key.to_string(), "discover:series:18:2019");
    }

    #[test]
    fn test_cache_key_genre_mapping() {
        assert_eq!(CacheKey::GenreMapping.to_string(), "genres");
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_set_in_background_then_read_back() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let (cache, handle) = Cache::new(client.clone()).await;

        let key = CacheKey::Search("cache_round_trip_test".to_string());
        let value = vec!["Heat".to_string(), "Ronin".to_string()];
        cache.set_in_background(&key, &value, 60);

        handle.shutdown().await;
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
