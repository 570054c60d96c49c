//! Rate limiting for the Riot API.
//!
//! Riot enforces its quotas per routing value and method. This module keeps
//! the gateway inside them by admitting each outbound call only when its
//! bucket has room on both horizons.
//!
//! ## Rate Limit Shape
//!
//! - **Short horizon**: 20 requests per second (development key)
//! - **Long horizon**: 100 requests per two minutes (development key)
//!
//! ## Example
//!
//! ```rust
//! use riot_gateway::rate_limit::{BucketKey, DualWindow, RateLimitConfig};
//! use std::time::Duration;
//!
//! let config = RateLimitConfig {
//!     short_limit: 2,
//!     ..RateLimitConfig::default()
//! };
//! let mut window = DualWindow::new(&config);
//! assert!(window.try_acquire().is_ok());
//! assert!(window.try_acquire().is_ok());
//! assert!(window.try_acquire().unwrap_err() > Duration::from_secs(1));
//!
//! let bucket = BucketKey::new("account", "americas");
//! assert_eq!(bucket.as_str(), "account-americas");
//! ```

mod bucket;
mod limiter;
mod window;

pub use bucket::BucketKey;
pub use limiter::{BucketRateLimiter, BucketUsage};
pub use window::DualWindow;

use std::time::Duration;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Length of the short horizon.
    pub short_window: Duration,
    /// Requests allowed per short horizon.
    pub short_limit: u32,
    /// Length of the long horizon.
    pub long_window: Duration,
    /// Requests allowed per long horizon.
    pub long_limit: u32,
    /// Extra time added to every computed wait.
    pub safety_margin: Duration,
    /// Whether to enable rate limiting.
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            short_window: Duration::from_millis(limits::development::SHORT_WINDOW_MS),
            short_limit: limits::development::SHORT_LIMIT,
            long_window: Duration::from_millis(limits::development::LONG_WINDOW_MS),
            long_limit: limits::development::LONG_LIMIT,
            safety_margin: Duration::from_millis(limits::SAFETY_MARGIN_MS),
            enabled: true,
        }
    }
}

impl RateLimitConfig {
    /// Development key limits.
    pub fn development() -> Self {
        Self::default()
    }

    /// Configuration that admits everything immediately.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Rate limit constants.
pub mod limits {
    /// Added to computed waits so a woken caller lands past the window edge.
    pub const SAFETY_MARGIN_MS: u64 = 50;

    /// Development key limits.
    pub mod development {
        /// Short horizon length.
        pub const SHORT_WINDOW_MS: u64 = 1_000;
        /// Requests per short horizon.
        pub const SHORT_LIMIT: u32 = 20;
        /// Long horizon length.
        pub const LONG_WINDOW_MS: u64 = 120_000;
        /// Requests per long horizon.
        pub const LONG_LIMIT: u32 = 100;
    }
}
