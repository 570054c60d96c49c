//! Redis cache backend.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde_json::Value;

use super::{CacheError, CachePort};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    ///
    /// `REDIS_URL` wins; otherwise the URL is assembled from `REDIS_HOST`
    /// and `REDIS_PORT`.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = lookup("REDIS_URL").unwrap_or_else(|| {
            let host = lookup("REDIS_HOST").unwrap_or_else(|| "localhost".to_string());
            let port = lookup("REDIS_PORT")
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(6379);
            format!("redis://{host}:{port}")
        });

        Self {
            url,
            connect_timeout: Duration::from_secs(
                lookup("REDIS_CONNECT_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

/// Redis-backed cache.
///
/// Uses a connection manager for automatic reconnection. Values are stored
/// as JSON strings with `SETEX`.
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connect, giving up after the configured timeout.
    pub async fn new(config: RedisConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Connection("Connection timed out".to_string()))?
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis cache");

        Ok(Self { conn })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, CacheError> {
        Self::new(RedisConfig::from_env()).await
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

#[async_trait]
impl CachePort for RedisCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let mut conn = self.conn.clone();
        let raw = match conn.get::<_, Option<String>>(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis GET failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cached value is not valid JSON");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), CacheError> {
        let raw =
            serde_json::to_string(value).map_err(|e| CacheError::Serialization(e.to_string()))?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, raw, ttl.as_secs().max(1))
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn
            .keys(pattern)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))?;
        if keys.is_empty() {
            return Ok(());
        }
        conn.del::<_, ()>(keys)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn exists(&self, key: &str) -> bool {
        let mut conn = self.conn.clone();
        match conn.exists::<_, bool>(key).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis EXISTS failed");
                false
            }
        }
    }

    async fn ttl(&self, key: &str) -> Option<Duration> {
        let mut conn = self.conn.clone();
        match conn.ttl::<_, i64>(key).await {
            // -2: no such key, -1: no expiry
            Ok(secs) if secs >= 0 => Some(Duration::from_secs(secs as u64)),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis TTL failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_from_url() {
        let config = RedisConfig::from_vars(|name| match name {
            "REDIS_URL" => Some("redis://cache:6380".to_string()),
            "REDIS_HOST" => Some("ignored".to_string()),
            _ => None,
        });
        assert_eq!(config.url, "redis://cache:6380");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_from_host_and_port() {
        let config = RedisConfig::from_vars(|name| match name {
            "REDIS_HOST" => Some("redis".to_string()),
            "REDIS_PORT" => Some("6390".to_string()),
            "REDIS_CONNECT_TIMEOUT_SECS" => Some("2".to_string()),
            _ => None,
        });
        assert_eq!(config.url, "redis://redis:6390");
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }

    async fn get_test_cache() -> Option<RedisCache> {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6389".to_string()),
            connect_timeout: Duration::from_secs(1),
        };

        RedisCache::new(config).await.ok()
    }

    #[tokio::test]
    async fn test_redis_cache_round_trip() {
        let Some(cache) = get_test_cache().await else {
            tracing::warn!("Redis not available, skipping test");
            return;
        };

        let key = "riot-gateway:test:key";
        cache
            .set(key, &json!({"puuid": "p1"}), Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(cache.get(key).await, Some(json!({"puuid": "p1"})));
        assert!(cache.ttl(key).await.is_some_and(|ttl| ttl <= Duration::from_secs(30)));

        cache.delete_pattern("riot-gateway:test:*").await.unwrap();
        assert!(!cache.exists(key).await);
    }
}
