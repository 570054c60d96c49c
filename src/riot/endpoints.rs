//! Riot API endpoint constants and host configuration.

use crate::rate_limit::BucketKey;

/// Address template for the regional API hosts; `{host}` is a platform or routing fragment.
pub const RIOT_API_TEMPLATE: &str = "https://{host}.api.riotgames.com";

/// Base URL for Data Dragon static data.
pub const DDRAGON_BASE_URL: &str = "https://ddragon.leagueoflegends.com";

/// Header carrying the API key (`X-Riot-Token`), lowercase as sent on the wire.
pub const API_KEY_HEADER: &str = "x-riot-token";

/// Most match ids the match-v5 list endpoint returns per call.
pub const MAX_MATCH_IDS: u32 = 100;

/// Routing-cluster endpoints.
pub mod routing {
    /// Account by Riot ID (`/{gameName}/{tagLine}` appended).
    pub const ACCOUNT_BY_RIOT_ID: &str = "/riot/account/v1/accounts/by-riot-id";
    /// Match ids by PUUID (`/{puuid}/ids` appended).
    pub const MATCHES_BY_PUUID: &str = "/lol/match/v5/matches/by-puuid";
    /// Match detail (`/{matchId}` appended).
    pub const MATCH: &str = "/lol/match/v5/matches";
}

/// Platform-shard endpoints.
pub mod platform {
    /// Summoner by PUUID (`/{puuid}` appended).
    pub const SUMMONER_BY_PUUID: &str = "/lol/summoner/v4/summoners/by-puuid";
    /// Ranked entries by summoner id (`/{summonerId}` appended).
    pub const LEAGUE_ENTRIES_BY_SUMMONER: &str = "/lol/league/v4/entries/by-summoner";
}

/// Data Dragon endpoints.
pub mod static_data {
    /// Published game versions, newest first.
    pub const VERSIONS: &str = "/api/versions.json";
    /// Champion catalog (`/cdn/{version}/data/en_US/champion.json`).
    pub const CDN: &str = "/cdn";
    /// Locale and file under a versioned CDN path.
    pub const CHAMPION_FILE: &[&str] = &["data", "en_US", "champion.json"];
}

/// Operation families, each rate limited on its own buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointFamily {
    /// account-v1, keyed by routing cluster
    Account,
    /// summoner-v4, keyed by platform
    Summoner,
    /// league-v4, keyed by platform
    League,
    /// match-v5, keyed by routing cluster
    Match,
    /// Data Dragon, one shared bucket
    StaticData,
}

impl EndpointFamily {
    /// Family prefix used in bucket keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointFamily::Account => "account",
            EndpointFamily::Summoner => "summoner",
            EndpointFamily::League => "league",
            EndpointFamily::Match => "match",
            EndpointFamily::StaticData => "ddragon",
        }
    }

    /// Bucket for this family on `target`. Static data ignores the target.
    pub fn bucket(&self, target: &str) -> BucketKey {
        match self {
            EndpointFamily::StaticData => BucketKey::named(self.as_str()),
            family => BucketKey::new(family.as_str(), target),
        }
    }
}

/// Base addresses of the upstream host groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamHosts {
    /// Template for platform and routing hosts; `{host}` is substituted.
    pub api_template: String,
    /// Base URL of the static-data host.
    pub static_data: String,
}

impl Default for UpstreamHosts {
    fn default() -> Self {
        Self {
            api_template: RIOT_API_TEMPLATE.to_string(),
            static_data: DDRAGON_BASE_URL.to_string(),
        }
    }
}

impl UpstreamHosts {
    /// Send every host group to one address (useful for testing with a mock server).
    pub fn uniform(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            api_template: base_url.clone(),
            static_data: base_url,
        }
    }

    /// Base URL for a platform or routing fragment.
    pub fn api_base(&self, host: &str) -> String {
        self.api_template.replace("{host}", host)
    }
}
