//! Logical operations over the read-through cache.
//!
//! Each service is generic over [`RiotApi`](crate::riot::RiotApi) so it can run against the
//! production [`RiotGateway`] or a fake. [`GatewayServices`] wires the
//! production stack together.
//!
//! ```rust,no_run
//! use riot_gateway::services::GatewayServices;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), riot_gateway::GatewayError> {
//!     let services = GatewayServices::from_env().await?;
//!
//!     let profile = services
//!         .summoners()
//!         .get_summoner_profile("Faker", "KR1", "kr")
//!         .await?;
//!     let history = services
//!         .matches()
//!         .get_match_history(&profile.account.puuid, "kr", 0, 10)
//!         .await?;
//!     println!("{} recent matches", history.len());
//!
//!     services.shutdown().await;
//!     Ok(())
//! }
//! ```

mod champions;
#[cfg(test)]
pub(crate) mod fake;
mod matches;
mod summoner;
pub mod tier_list;

pub use champions::ChampionService;
pub use matches::{DEFAULT_MATCH_COUNT, MAX_DETAILED_MATCHES, MatchService};
pub use summoner::SummonerService;
pub use tier_list::{ChampionStats, Role, Tier};

use std::sync::Arc;

use crate::cache::{self, CachePort, ReadThroughCache};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::RiotGateway;

/// The gateway, the cache and the three services built on them.
#[derive(Clone)]
pub struct GatewayServices {
    gateway: Arc<RiotGateway>,
    cache: ReadThroughCache,
    summoners: SummonerService<RiotGateway>,
    matches: MatchService<RiotGateway>,
    champions: ChampionService<RiotGateway>,
}

impl GatewayServices {
    /// Wire services over an existing gateway and store.
    pub fn new(gateway: RiotGateway, store: Arc<dyn CachePort>) -> Self {
        let gateway = Arc::new(gateway);
        let cache = ReadThroughCache::new(store);
        Self {
            summoners: SummonerService::new(gateway.clone(), cache.clone()),
            matches: MatchService::new(gateway.clone(), cache.clone()),
            champions: ChampionService::new(gateway.clone(), cache.clone()),
            gateway,
            cache,
        }
    }

    /// Build the gateway from `config` and wire it to `store`.
    pub fn from_config(config: &GatewayConfig, store: Arc<dyn CachePort>) -> Result<Self, GatewayError> {
        Ok(Self::new(RiotGateway::from_config(config)?, store))
    }

    /// Load the configuration and connect the cache from the environment.
    ///
    /// An unreachable cache is logged and replaced by an always-miss store.
    pub async fn from_env() -> Result<Self, GatewayError> {
        let config = GatewayConfig::from_env()?;
        let store = cache::connect_from_env().await;
        Self::from_config(&config, store)
    }

    /// The shared gateway.
    pub fn gateway(&self) -> &RiotGateway {
        &self.gateway
    }

    /// The read-through cache shared by all services.
    pub fn cache(&self) -> &ReadThroughCache {
        &self.cache
    }

    /// Account, summoner and ranked lookups.
    pub fn summoners(&self) -> &SummonerService<RiotGateway> {
        &self.summoners
    }

    /// Match history and match records.
    pub fn matches(&self) -> &MatchService<RiotGateway> {
        &self.matches
    }

    /// Champion catalog, tier list and game version.
    pub fn champions(&self) -> &ChampionService<RiotGateway> {
        &self.champions
    }

    /// Drain the request queue. Later calls fail with [`GatewayError::GatewayClosed`].
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down gateway services");
        self.gateway.shutdown().await;
    }
}

/// Reject a blank identifier before any cache or upstream access.
pub(crate) fn require_param(name: &str, value: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidArgument(format!(
            "Missing required parameter: {name}"
        )));
    }
    Ok(())
}

impl std::fmt::Debug for GatewayServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayServices")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_param() {
        assert!(require_param("puuid", "p1").is_ok());

        let error = require_param("puuid", "  ").unwrap_err();
        assert!(matches!(error, GatewayError::InvalidArgument(_)));
        assert_eq!(
            error.to_string(),
            "Invalid argument: Missing required parameter: puuid"
        );
    }
}
