//! # Riot Gateway
//!
//! A rate-limited, caching async gateway for the Riot Games League of Legends APIs.
//!
//! ## Features
//!
//! - Per-bucket dual-window rate limiting (short and long horizon)
//! - FIFO request queue with global or per-bucket dispatch
//! - Bounded retries honouring `Retry-After` on 429 and backing off on 503
//! - Read-through caching with a fixed TTL per data class (Redis or in-memory)
//! - Region table mapping short codes to platform and routing hosts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use riot_gateway::cache::InMemoryCache;
//! use riot_gateway::config::GatewayConfig;
//! use riot_gateway::services::GatewayServices;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatewayConfig::from_env()?;
//!     let services = GatewayServices::from_config(&config, Arc::new(InMemoryCache::new()))?;
//!
//!     let version = services.champions().get_latest_version().await?;
//!     println!("Latest version: {}", version);
//!
//!     services.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod rate_limit;
pub mod riot;
pub mod services;

// Re-export commonly used types at crate root
pub use error::{ApiError, GatewayError};
pub use gateway::RiotGateway;
pub use riot::RiotApi;

/// Result type alias using GatewayError
pub type Result<T> = std::result::Result<T, GatewayError>;
