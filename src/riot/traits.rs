//! Trait definition for upstream Riot API access.
//!
//! [`RiotApi`] abstracts the seven upstream operations the service layer
//! needs. [`RiotGateway`](crate::gateway::RiotGateway) is the production
//! implementation; tests substitute fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use riot_gateway::riot::RiotApi;
//!
//! async fn level_of<A: RiotApi>(api: &A, puuid: &str) -> Result<i64, riot_gateway::GatewayError> {
//!     let summoner = api.get_summoner_by_puuid(puuid, "euw").await?;
//!     Ok(summoner.summoner_level)
//! }
//! ```

use std::future::Future;

use crate::error::GatewayError;
use crate::riot::types::{Account, ChampionData, LeagueEntry, MatchDto, Summoner};

/// Version argument that resolves to the newest published catalog.
pub const LATEST_VERSION: &str = "latest";

/// Trait defining the upstream Riot API operations.
///
/// All methods are async and return `Result<T, GatewayError>`. Region
/// arguments are short codes (`na`, `euw`, ...); unknown codes resolve to
/// the default region.
pub trait RiotApi: Send + Sync {
    /// Get an account by Riot ID.
    fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> impl Future<Output = Result<Account, GatewayError>> + Send;

    /// Get a summoner profile by PUUID.
    fn get_summoner_by_puuid(
        &self,
        puuid: &str,
        region: &str,
    ) -> impl Future<Output = Result<Summoner, GatewayError>> + Send;

    /// Get ranked entries for a summoner.
    fn get_league_entries(
        &self,
        summoner_id: &str,
        region: &str,
    ) -> impl Future<Output = Result<Vec<LeagueEntry>, GatewayError>> + Send;

    /// Get a page of match ids for a player, newest first.
    fn get_match_ids(
        &self,
        puuid: &str,
        region: &str,
        start: u32,
        count: u32,
    ) -> impl Future<Output = Result<Vec<String>, GatewayError>> + Send;

    /// Get a full match record.
    fn get_match(
        &self,
        match_id: &str,
        region: &str,
    ) -> impl Future<Output = Result<MatchDto, GatewayError>> + Send;

    /// Get the champion catalog for `version`, or the newest for [`LATEST_VERSION`].
    fn get_champion_data(
        &self,
        version: &str,
    ) -> impl Future<Output = Result<ChampionData, GatewayError>> + Send;

    /// Get the newest published game version.
    fn get_latest_version(&self) -> impl Future<Output = Result<String, GatewayError>> + Send;
}
