//! Response types for the Riot API and Data Dragon.
//!
//! Fields follow the upstream camelCase names. Records that the gateway only
//! passes through keep unknown fields in an `extra` map so the cached copy is
//! the full upstream record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Riot account (account-v1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Globally unique player id
    pub puuid: String,
    /// Riot ID name part
    #[serde(default)]
    pub game_name: Option<String>,
    /// Riot ID tag part
    #[serde(default)]
    pub tag_line: Option<String>,
}

/// Summoner profile (summoner-v4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summoner {
    /// Encrypted summoner id, used by league-v4
    #[serde(default)]
    pub id: String,
    /// Encrypted account id
    #[serde(default)]
    pub account_id: Option<String>,
    /// Globally unique player id
    pub puuid: String,
    /// Profile icon
    pub profile_icon_id: i64,
    /// Last modification time, epoch milliseconds
    pub revision_date: i64,
    /// Summoner level
    pub summoner_level: i64,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One ranked queue standing (league-v4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntry {
    /// Queue, e.g. `RANKED_SOLO_5x5`
    pub queue_type: String,
    /// Tier, e.g. `GOLD`
    #[serde(default)]
    pub tier: String,
    /// Division inside the tier, e.g. `II`
    #[serde(default)]
    pub rank: String,
    /// League points
    pub league_points: i32,
    /// Games won
    pub wins: u32,
    /// Games lost
    pub losses: u32,
    #[serde(default)]
    pub veteran: bool,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default)]
    pub fresh_blood: bool,
    #[serde(default)]
    pub hot_streak: bool,
}

impl LeagueEntry {
    /// Win rate in percent, `0.0` when no games were played.
    pub fn win_rate(&self) -> f64 {
        let games = self.wins + self.losses;
        if games == 0 {
            0.0
        } else {
            f64::from(self.wins) * 100.0 / f64::from(games)
        }
    }
}

/// Full match record (match-v5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

/// Match metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    #[serde(default)]
    pub data_version: String,
    pub match_id: String,
    /// PUUIDs of the participants
    pub participants: Vec<String>,
}

/// Match body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub game_creation: i64,
    /// Seconds
    pub game_duration: i64,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default)]
    pub queue_id: i64,
    pub participants: Vec<Participant>,
    /// Teams, bans, objectives and everything else
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One player's line in a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub puuid: String,
    #[serde(default)]
    pub champion_name: String,
    #[serde(default)]
    pub champion_id: i64,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub team_position: String,
    #[serde(default)]
    pub win: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Participant {
    /// (kills + assists) / deaths, rounded to two decimals; perfect games return kills + assists.
    pub fn kda(&self) -> f64 {
        let takedowns = f64::from(self.kills + self.assists);
        if self.deaths == 0 {
            takedowns
        } else {
            (takedowns / f64::from(self.deaths) * 100.0).round() / 100.0
        }
    }
}

/// Data Dragon champion catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionData {
    #[serde(rename = "type", default)]
    pub data_type: String,
    #[serde(default)]
    pub format: String,
    pub version: String,
    /// Champions keyed by their string id (e.g. `Aatrox`)
    pub data: BTreeMap<String, Champion>,
}

/// One catalog champion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    /// String id, e.g. `Aatrox`
    pub id: String,
    /// Numeric id as a string, e.g. `266`
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Identity, profile and ranked standings fetched together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerProfile {
    pub account: Account,
    pub summoner: Summoner,
    pub ranked_stats: Vec<LeagueEntry>,
}
