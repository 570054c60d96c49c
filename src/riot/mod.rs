//! Riot API access: regions, endpoints, call adapters and HTTP transport.
//!
//! # Trait-based API
//!
//! The [`RiotApi`] trait abstracts all upstream operations, enabling:
//! - Mock implementations for testing the cache and service layers
//! - The rate-limited, queued [`RiotGateway`](crate::gateway::RiotGateway)
//!
//! ```rust
//! use riot_gateway::riot::{Region, UpstreamHosts, UpstreamRequest};
//!
//! let hosts = UpstreamHosts::default();
//! let request = UpstreamRequest::match_detail(&hosts, "EUW1_7000000000", "euw");
//! assert_eq!(request.base_url, "https://europe.api.riotgames.com");
//! assert_eq!(request.bucket.as_str(), "match-europe");
//! assert_eq!(Region::resolve("euw").platform, "euw1");
//! ```

mod client;
mod endpoints;
mod regions;
mod request;
mod traits;
pub mod types;

pub use client::{DEFAULT_TIMEOUT, RiotClient, RiotClientBuilder};
pub use endpoints::*;
pub use regions::{DEFAULT_REGION, REGIONS, Region, RoutingRegion};
pub use request::UpstreamRequest;
pub use traits::{LATEST_VERSION, RiotApi};
