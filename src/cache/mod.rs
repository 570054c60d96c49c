//! Response caching.
//!
//! [`CachePort`] is the narrow interface to an external TTL key-value store.
//! [`ReadThroughCache`] fronts each logical fetch with it, choosing the TTL by
//! [`DataClass`]. A store failure never fails a caller; it reads as a miss.
//!
//! Backends:
//! - [`RedisCache`] (feature `redis`)
//! - [`InMemoryCache`] for tests and single-process use
//! - [`NullCache`] when no store is reachable

mod memory;
mod null;
mod policy;
mod read_through;
#[cfg(feature = "redis")]
mod redis;

pub use memory::InMemoryCache;
pub use null::NullCache;
pub use policy::{DataClass, keys};
pub use read_through::ReadThroughCache;
#[cfg(feature = "redis")]
pub use redis::{RedisCache, RedisConfig};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Interface to an external TTL key-value store holding JSON values.
///
/// Reads report an unreachable store as absent. Writes return the failure so
/// the caller can log it.
#[async_trait]
pub trait CachePort: Send + Sync {
    /// Get a value, or `None` when absent, expired or unreadable.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Store a value for `ttl`.
    async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), CacheError>;

    /// Remove one key.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Remove every key matching a glob pattern such as `matches:na:*`.
    async fn delete_pattern(&self, pattern: &str) -> Result<(), CacheError>;

    /// Check whether a key is present.
    async fn exists(&self, key: &str) -> bool;

    /// Remaining lifetime of a key, `None` if absent or without expiry.
    async fn ttl(&self, key: &str) -> Option<Duration>;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

/// Connect the store named by the environment.
///
/// Tries Redis (see [`RedisConfig::from_env`]) and falls back to a
/// [`NullCache`] when it is unreachable or the `redis` feature is off.
pub async fn connect_from_env() -> Arc<dyn CachePort> {
    #[cfg(feature = "redis")]
    match RedisCache::from_env().await {
        Ok(cache) => return Arc::new(cache),
        Err(e) => tracing::warn!(error = %e, "Redis unavailable, continuing without cache"),
    }

    Arc::new(NullCache)
}

/// Match `key` against a glob where `*` stands for any run of characters.
pub(crate) fn glob_match(pattern: &str, key: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return key.is_empty();
    };
    let Some(mut rest) = key.strip_prefix(first) else {
        return false;
    };

    let parts: Vec<&str> = parts.collect();
    let Some((last, middle)) = parts.split_last() else {
        // No wildcard at all.
        return rest.is_empty();
    };

    for part in middle {
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}
