use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{CacheError, CachePort};

/// A store that keeps nothing. Every read misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

#[async_trait]
impl CachePort for NullCache {
    async fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    async fn set(&self, _key: &str, _value: &Value, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete_pattern(&self, _pattern: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn exists(&self, _key: &str) -> bool {
        false
    }

    async fn ttl(&self, _key: &str) -> Option<Duration> {
        None
    }
}
