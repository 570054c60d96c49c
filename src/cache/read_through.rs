use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CachePort, DataClass};
use crate::error::GatewayError;

/// Fronts logical fetches with a [`CachePort`].
///
/// A hit returns without touching upstream. On a miss the fetch runs and its
/// result is written back with the TTL of its [`DataClass`]. Store failures
/// are logged and never reach the caller.
#[derive(Clone)]
pub struct ReadThroughCache {
    store: Arc<dyn CachePort>,
}

impl ReadThroughCache {
    /// Cache fronted by `store`.
    pub fn new(store: Arc<dyn CachePort>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn CachePort> {
        &self.store
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    pub async fn fetch<T, F, Fut>(&self, key: &str, class: DataClass, fetch: F) -> Result<T, GatewayError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        if let Some(cached) = self.store.get(key).await {
            match serde_json::from_value::<T>(cached) {
                Ok(value) => {
                    tracing::debug!(key, "Cache hit");
                    return Ok(value);
                }
                Err(e) => tracing::debug!(key, error = %e, "Discarding unreadable cached value"),
            }
        } else {
            tracing::debug!(key, "Cache miss");
        }

        let value = fetch().await?;
        self.store_value(key, class, &value).await;
        Ok(value)
    }

    async fn store_value<T: Serialize>(&self, key: &str, class: DataClass, value: &T) {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "Could not encode value for cache");
                return;
            }
        };
        if let Err(e) = self.store.set(key, &json, class.ttl()).await {
            tracing::warn!(key, error = %e, "Cache write failed");
        }
    }

    /// Remove one key, logging failures.
    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            tracing::warn!(key, error = %e, "Cache delete failed");
        }
    }

    /// Remove every key matching `pattern`, logging failures.
    pub async fn invalidate_pattern(&self, pattern: &str) {
        if let Err(e) = self.store.delete_pattern(pattern).await {
            tracing::warn!(pattern, error = %e, "Cache pattern delete failed");
        }
    }
}

impl std::fmt::Debug for ReadThroughCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, InMemoryCache};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct BrokenStore;

    #[async_trait]
    impl CachePort for BrokenStore {
        async fn get(&self, _key: &str) -> Option<Value> {
            None
        }
        async fn set(&self, _key: &str, _value: &Value, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Connection("refused".into()))
        }
        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Connection("refused".into()))
        }
        async fn delete_pattern(&self, _pattern: &str) -> Result<(), CacheError> {
            Err(CacheError::Connection("refused".into()))
        }
        async fn exists(&self, _key: &str) -> bool {
            false
        }
        async fn ttl(&self, _key: &str) -> Option<Duration> {
            None
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_fetch_is_a_hit() {
        let cache = ReadThroughCache::new(Arc::new(InMemoryCache::new()));
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: Vec<String> = cache
                .fetch("matches:na:p1:0:2", DataClass::MatchHistory, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["NA1_1".to_string(), "NA1_2".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, vec!["NA1_1", "NA1_2"]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.store().ttl("matches:na:p1:0:2").await,
            Some(DataClass::MatchHistory.ttl())
        );
    }

    #[tokio::test]
    async fn test_unreadable_value_is_a_miss() {
        let store = Arc::new(InMemoryCache::new());
        store
            .set("version:latest", &json!({"not": "a string"}), Duration::from_secs(60))
            .await
            .unwrap();
        let cache = ReadThroughCache::new(store);

        let version: String = cache
            .fetch("version:latest", DataClass::Static, || async { Ok("14.1.1".to_string()) })
            .await
            .unwrap();

        assert_eq!(version, "14.1.1");
        assert_eq!(cache.store().get("version:latest").await, Some(json!("14.1.1")));
    }

    #[tokio::test]
    async fn test_store_failure_falls_through() {
        let cache = ReadThroughCache::new(Arc::new(BrokenStore));

        let value: u32 = cache
            .fetch("k", DataClass::Summoner, || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);

        cache.invalidate("k").await;
        cache.invalidate_pattern("k*").await;
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let store = Arc::new(InMemoryCache::new());
        let cache = ReadThroughCache::new(store.clone());

        let result: Result<u32, _> = cache
            .fetch("match:NA1_9", DataClass::MatchDetail, || async {
                Err(GatewayError::ServiceUnavailable)
            })
            .await;

        assert!(matches!(result, Err(GatewayError::ServiceUnavailable)));
        assert!(store.is_empty().await);
    }
}
