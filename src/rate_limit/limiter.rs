//! Per-bucket admission control.
//!
//! [`BucketRateLimiter`] owns one [`DualWindow`] per [`BucketKey`], each
//! behind its own lock, so a full bucket never delays another one.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::rate_limit::{BucketKey, DualWindow, RateLimitConfig};

/// Usage snapshot for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketUsage {
    /// Permits left in the short horizon.
    pub short_remaining: usize,
    /// Permits left in the long horizon.
    pub long_remaining: usize,
}

/// Admission controller consulted before every upstream call.
///
/// # Example
///
/// ```rust
/// use riot_gateway::rate_limit::{BucketKey, BucketRateLimiter, RateLimitConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let limiter = BucketRateLimiter::new(RateLimitConfig::default());
/// let bucket = BucketKey::new("summoner", "na1");
///
/// // Suspends until both horizons have room, then records the request.
/// limiter.admit(&bucket).await;
/// # }
/// ```
#[derive(Debug)]
pub struct BucketRateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<BucketKey, Arc<Mutex<DualWindow>>>>,
}

impl BucketRateLimiter {
    /// Create a limiter applying `config` to every bucket.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Wait until `bucket` has a free slot on both horizons, then record one usage.
    ///
    /// The check is re-run after every sleep: a concurrent caller may take the
    /// slot that the sleep was waiting for.
    pub async fn admit(&self, bucket: &BucketKey) {
        if !self.config.enabled {
            return;
        }

        let window = self.window_for(bucket).await;
        loop {
            let mut limiter = window.lock().await;
            match limiter.try_acquire() {
                Ok(()) => return,
                Err(wait_time) => {
                    drop(limiter);
                    tracing::debug!("Bucket {} at capacity, waiting {:?}", bucket, wait_time);
                    tokio::time::sleep(wait_time).await;
                }
            }
        }
    }

    /// Remaining permits for a bucket; untouched buckets report full capacity.
    pub async fn usage(&self, bucket: &BucketKey) -> BucketUsage {
        let window = self.windows.lock().await.get(bucket).cloned();
        match window {
            Some(window) => {
                let window = window.lock().await;
                BucketUsage {
                    short_remaining: window.short_remaining(),
                    long_remaining: window.long_remaining(),
                }
            }
            None => BucketUsage {
                short_remaining: self.config.short_limit.max(1) as usize,
                long_remaining: self.config.long_limit.max(1) as usize,
            },
        }
    }

    /// Get the number of buckets being tracked.
    pub async fn tracked_buckets(&self) -> usize {
        self.windows.lock().await.len()
    }

    /// Forget buckets whose long horizon is empty.
    ///
    /// Windows currently locked by an admission are kept.
    pub async fn cleanup(&self) {
        let mut windows = self.windows.lock().await;
        windows.retain(|_, window| match window.try_lock() {
            Ok(window) => !window.is_empty(),
            Err(_) => true,
        });
    }

    async fn window_for(&self, bucket: &BucketKey) -> Arc<Mutex<DualWindow>> {
        let mut windows = self.windows.lock().await;
        windows
            .entry(bucket.clone())
            .or_insert_with(|| Arc::new(Mutex::new(DualWindow::new(&self.config))))
            .clone()
    }
}
