//! Player lookups.

use std::sync::Arc;

use crate::cache::{DataClass, ReadThroughCache, keys};
use crate::error::GatewayError;
use crate::riot::types::{Account, LeagueEntry, Summoner, SummonerProfile};
use crate::riot::{RiotApi, Region};
use crate::services::require_param;

/// Cached account, summoner and ranked lookups.
///
/// Region codes are normalised through the region table before they enter a
/// cache key, so `EUW` and `euw` share entries.
pub struct SummonerService<A> {
    api: Arc<A>,
    cache: ReadThroughCache,
}

impl<A> Clone for SummonerService<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<A: RiotApi> SummonerService<A> {
    /// Service over `api`, caching through `cache`.
    pub fn new(api: Arc<A>, cache: ReadThroughCache) -> Self {
        Self { api, cache }
    }

    /// Account, summoner and ranked entries for a Riot ID.
    ///
    /// The three upstream calls run in sequence and the result is cached as
    /// one value under the composite key.
    pub async fn get_summoner_profile(
        &self,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> Result<SummonerProfile, GatewayError> {
        require_param("gameName", game_name)?;
        require_param("tagLine", tag_line)?;
        let region = Region::resolve(region).code;
        let key = keys::summoner_profile(region, game_name, tag_line);

        self.cache
            .fetch(&key, DataClass::Summoner, || async {
                let account = self
                    .api
                    .get_account_by_riot_id(game_name, tag_line, region)
                    .await?;
                let summoner = self.api.get_summoner_by_puuid(&account.puuid, region).await?;
                let ranked_stats = self.api.get_league_entries(&summoner.id, region).await?;
                Ok(SummonerProfile {
                    account,
                    summoner,
                    ranked_stats,
                })
            })
            .await
    }

    /// Resolve a Riot ID to an account.
    pub async fn get_account(
        &self,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> Result<Account, GatewayError> {
        require_param("gameName", game_name)?;
        require_param("tagLine", tag_line)?;
        let region = Region::resolve(region).code;
        let key = keys::account(region, game_name, tag_line);
        self.cache
            .fetch(&key, DataClass::Summoner, || {
                self.api.get_account_by_riot_id(game_name, tag_line, region)
            })
            .await
    }

    /// Summoner record of a PUUID.
    pub async fn get_summoner_by_puuid(
        &self,
        puuid: &str,
        region: &str,
    ) -> Result<Summoner, GatewayError> {
        require_param("puuid", puuid)?;
        let region = Region::resolve(region).code;
        let key = keys::summoner_by_puuid(region, puuid);
        self.cache
            .fetch(&key, DataClass::Summoner, || {
                self.api.get_summoner_by_puuid(puuid, region)
            })
            .await
    }

    /// Ranked standings of a summoner, one entry per queue.
    pub async fn get_ranked_stats(
        &self,
        summoner_id: &str,
        region: &str,
    ) -> Result<Vec<LeagueEntry>, GatewayError> {
        require_param("summonerId", summoner_id)?;
        let region = Region::resolve(region).code;
        let key = keys::ranked(region, summoner_id);
        self.cache
            .fetch(&key, DataClass::Summoner, || {
                self.api.get_league_entries(summoner_id, region)
            })
            .await
    }

    /// Drop the cached composite profile of a Riot ID.
    pub async fn invalidate_summoner(&self, game_name: &str, tag_line: &str, region: &str) {
        let region = Region::resolve(region).code;
        self.cache
            .invalidate(&keys::summoner_profile(region, game_name, tag_line))
            .await;
        self.cache
            .invalidate(&keys::account(region, game_name, tag_line))
            .await;
    }
}
