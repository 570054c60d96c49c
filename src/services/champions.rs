//! Static champion data and the tier list.

use std::sync::Arc;

use crate::cache::{DataClass, ReadThroughCache, keys};
use crate::error::GatewayError;
use crate::riot::types::{Champion, ChampionData};
use crate::riot::{LATEST_VERSION, RiotApi};
use crate::services::tier_list::{ChampionStats, Role, generate_tier_list};

/// Cached Data Dragon lookups.
pub struct ChampionService<A> {
    api: Arc<A>,
    cache: ReadThroughCache,
}

impl<A> Clone for ChampionService<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<A: RiotApi> ChampionService<A> {
    /// Service over `api`, caching through `cache`.
    pub fn new(api: Arc<A>, cache: ReadThroughCache) -> Self {
        Self { api, cache }
    }

    /// The newest champion catalog.
    pub async fn get_all_champions(&self) -> Result<ChampionData, GatewayError> {
        self.cache
            .fetch(keys::CHAMPIONS_ALL, DataClass::Static, || {
                self.api.get_champion_data(LATEST_VERSION)
            })
            .await
    }

    /// The catalog of a given version, or the newest for `"latest"`.
    pub async fn get_champion_catalog(&self, version: &str) -> Result<ChampionData, GatewayError> {
        if version.eq_ignore_ascii_case(LATEST_VERSION) {
            return self.get_all_champions().await;
        }

        self.cache
            .fetch(&keys::champions(version), DataClass::Static, || {
                self.api.get_champion_data(version)
            })
            .await
    }

    /// Find a champion by numeric key (e.g. `"266"`).
    pub async fn get_champion_by_id(&self, champion_id: &str) -> Result<Option<Champion>, GatewayError> {
        let catalog = self.get_all_champions().await?;
        Ok(catalog
            .data
            .into_values()
            .find(|champion| champion.key == champion_id))
    }

    /// Tier list for a role.
    ///
    /// An unknown role fails with [`GatewayError::InvalidArgument`] before the
    /// cache or upstream is touched.
    pub async fn get_tier_list(&self, role: &str) -> Result<Vec<ChampionStats>, GatewayError> {
        let role: Role = role.parse()?;

        self.cache
            .fetch(&keys::tier_list(role.as_str()), DataClass::TierList, || async {
                let catalog = self.get_all_champions().await?;
                let stats = generate_tier_list(&catalog, role, &mut rand::thread_rng());
                Ok(stats)
            })
            .await
    }

    /// The newest published game version.
    pub async fn get_latest_version(&self) -> Result<String, GatewayError> {
        self.cache
            .fetch(keys::LATEST_VERSION, DataClass::Static, || {
                self.api.get_latest_version()
            })
            .await
    }
}
