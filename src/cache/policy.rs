//! TTL classes and cache keys.

use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Volatility class of a cached value. Each class has a fixed TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataClass {
    /// Champion catalog and game version: 24 hours.
    Static,
    /// Derived tier list: 1 hour.
    TierList,
    /// Accounts, summoner profiles and ranked entries: 5 minutes.
    Summoner,
    /// Match id lists: 10 minutes.
    MatchHistory,
    /// Completed match records: 7 days.
    MatchDetail,
}

impl DataClass {
    /// Time to live for values of this class.
    pub const fn ttl(self) -> Duration {
        match self {
            DataClass::Static => Duration::from_secs(DAY),
            DataClass::TierList => Duration::from_secs(HOUR),
            DataClass::Summoner => Duration::from_secs(5 * MINUTE),
            DataClass::MatchHistory => Duration::from_secs(10 * MINUTE),
            DataClass::MatchDetail => Duration::from_secs(7 * DAY),
        }
    }
}

/// Cache key builders.
pub mod keys {
    /// Latest champion catalog.
    pub const CHAMPIONS_ALL: &str = "champions:all";

    /// Latest game version.
    pub const LATEST_VERSION: &str = "version:latest";

    /// Champion catalog of a pinned game version.
    pub fn champions(version: &str) -> String {
        format!("champions:version:{version}")
    }

    /// Tier list of a role.
    pub fn tier_list(role: &str) -> String {
        format!("tierlist:{role}")
    }

    /// Composite profile (account, summoner and ranked entries).
    pub fn summoner_profile(region: &str, game_name: &str, tag_line: &str) -> String {
        format!("summoner:{region}:{game_name}:{tag_line}")
    }

    /// Account resolved from a Riot ID.
    pub fn account(region: &str, game_name: &str, tag_line: &str) -> String {
        format!("account:{region}:{game_name}:{tag_line}")
    }

    /// Summoner record of a PUUID.
    pub fn summoner_by_puuid(region: &str, puuid: &str) -> String {
        format!("summoner:puuid:{region}:{puuid}")
    }

    /// Ranked entries of a summoner.
    pub fn ranked(region: &str, summoner_id: &str) -> String {
        format!("ranked:{region}:{summoner_id}")
    }

    /// One page of match ids.
    pub fn match_ids(region: &str, puuid: &str, start: u32, count: u32) -> String {
        format!("matches:{region}:{puuid}:{start}:{count}")
    }

    /// Every cached match id page of one player.
    pub fn match_ids_pattern(region: &str, puuid: &str) -> String {
        format!("matches:{region}:{puuid}:*")
    }

    /// One full match record.
    pub fn match_detail(match_id: &str) -> String {
        format!("match:{match_id}")
    }
}
