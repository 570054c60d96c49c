//! Dual-horizon sliding window.
//!
//! Riot development keys are limited on two horizons at once (20 requests per
//! second and 100 requests per two minutes). A [`DualWindow`] keeps the
//! timestamps of admitted requests for the longer horizon and checks both
//! limits before recording a new one.
//!
//! # Example
//!
//! ```rust
//! use riot_gateway::rate_limit::{DualWindow, RateLimitConfig};
//!
//! let mut window = DualWindow::new(&RateLimitConfig::default());
//! assert!(window.try_acquire().is_ok());
//! assert_eq!(window.short_remaining(), 19);
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

use crate::rate_limit::RateLimitConfig;

/// Sliding window enforcing a short and a long limit simultaneously.
///
/// Timestamps are taken from [`tokio::time::Instant`], so a paused test
/// runtime controls the clock.
#[derive(Debug)]
pub struct DualWindow {
    /// Admitted request timestamps, oldest first
    requests: VecDeque<Instant>,
    short_window: Duration,
    short_limit: usize,
    long_window: Duration,
    long_limit: usize,
    /// Added to every computed wait so a woken caller lands past the boundary
    safety_margin: Duration,
}

impl DualWindow {
    /// Create a window from the configured limits.
    ///
    /// Limits of zero are raised to one; a window that can never admit would
    /// park its callers forever.
    pub fn new(config: &RateLimitConfig) -> Self {
        let long_limit = config.long_limit.max(1) as usize;
        Self {
            requests: VecDeque::with_capacity(long_limit),
            short_window: config.short_window,
            short_limit: config.short_limit.max(1) as usize,
            long_window: config.long_window.max(config.short_window),
            long_limit,
            safety_margin: config.safety_margin,
        }
    }

    /// Try to record a request now.
    ///
    /// Returns `Ok(())` if admitted, `Err(wait_time)` if either horizon is full.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        self.try_acquire_at(Instant::now())
    }

    /// Try to record a request at `now`.
    ///
    /// `now` must not go backwards between calls.
    pub fn try_acquire_at(&mut self, now: Instant) -> Result<(), Duration> {
        self.prune(now);

        let in_short = self.count_within(now, self.short_window);
        if in_short >= self.short_limit {
            // Oldest timestamp still inside the short horizon.
            let oldest = self.requests[self.requests.len() - in_short];
            let wait = self
                .short_window
                .saturating_sub(now.saturating_duration_since(oldest));
            return Err(wait + self.safety_margin);
        }

        if self.requests.len() >= self.long_limit {
            let wait = self
                .requests
                .front()
                .map(|oldest| {
                    self.long_window
                        .saturating_sub(now.saturating_duration_since(*oldest))
                })
                .unwrap_or_default();
            return Err(wait + self.safety_margin);
        }

        self.requests.push_back(now);
        Ok(())
    }

    /// Permits left in the short horizon.
    pub fn short_remaining(&self) -> usize {
        self.short_limit
            .saturating_sub(self.count_within(Instant::now(), self.short_window))
    }

    /// Permits left in the long horizon.
    pub fn long_remaining(&self) -> usize {
        self.long_limit
            .saturating_sub(self.count_within(Instant::now(), self.long_window))
    }

    /// Check if the window has no request inside the long horizon.
    pub fn is_empty(&self) -> bool {
        self.count_within(Instant::now(), self.long_window) == 0
    }

    /// Drop timestamps older than the long horizon.
    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.requests.front() {
            if now.saturating_duration_since(*oldest) >= self.long_window {
                self.requests.pop_front();
            } else {
                break;
            }
        }
    }

    /// Count timestamps younger than `horizon`, scanning from the newest.
    fn count_within(&self, now: Instant, horizon: Duration) -> usize {
        self.requests
            .iter()
            .rev()
            .take_while(|ts| now.saturating_duration_since(**ts) < horizon)
            .count()
    }
}
