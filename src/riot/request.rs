//! Upstream call adapters.
//!
//! Each constructor maps one logical resource and a caller-supplied region
//! code to the host, path, query and bucket of the upstream call. They do no
//! I/O.

use url::Url;

use crate::error::GatewayError;
use crate::rate_limit::BucketKey;
use crate::riot::endpoints::{
    EndpointFamily, MAX_MATCH_IDS, UpstreamHosts, platform, routing, static_data,
};
use crate::riot::regions::Region;

/// A fully resolved upstream GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Scheme and host, e.g. `https://europe.api.riotgames.com`.
    pub base_url: String,
    /// Unencoded path segments.
    pub segments: Vec<String>,
    /// Query parameters.
    pub query: Vec<(&'static str, String)>,
    /// Rate-limit bucket the call is accounted to.
    pub bucket: BucketKey,
}

impl UpstreamRequest {
    fn new(base_url: String, prefix: &str, dynamic: &[&str], bucket: BucketKey) -> Self {
        let segments = prefix
            .split('/')
            .filter(|s| !s.is_empty())
            .chain(dynamic.iter().copied())
            .map(str::to_string)
            .collect();
        Self {
            base_url,
            segments,
            query: Vec::new(),
            bucket,
        }
    }

    /// Account lookup by Riot ID, on the routing cluster.
    pub fn account_by_riot_id(
        hosts: &UpstreamHosts,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> Self {
        let routing_region = Region::resolve(region).routing.as_str();
        Self::new(
            hosts.api_base(routing_region),
            routing::ACCOUNT_BY_RIOT_ID,
            &[game_name, tag_line],
            EndpointFamily::Account.bucket(routing_region),
        )
    }

    /// Summoner profile by PUUID, on the platform shard.
    pub fn summoner_by_puuid(hosts: &UpstreamHosts, puuid: &str, region: &str) -> Self {
        let platform_id = Region::resolve(region).platform;
        Self::new(
            hosts.api_base(platform_id),
            platform::SUMMONER_BY_PUUID,
            &[puuid],
            EndpointFamily::Summoner.bucket(platform_id),
        )
    }

    /// Ranked entries by summoner id, on the platform shard.
    pub fn league_entries(hosts: &UpstreamHosts, summoner_id: &str, region: &str) -> Self {
        let platform_id = Region::resolve(region).platform;
        Self::new(
            hosts.api_base(platform_id),
            platform::LEAGUE_ENTRIES_BY_SUMMONER,
            &[summoner_id],
            EndpointFamily::League.bucket(platform_id),
        )
    }

    /// Match id page for a player, on the routing cluster.
    ///
    /// `count` is clamped to [`MAX_MATCH_IDS`].
    pub fn match_ids(
        hosts: &UpstreamHosts,
        puuid: &str,
        region: &str,
        start: u32,
        count: u32,
    ) -> Self {
        let routing_region = Region::resolve(region).routing.as_str();
        let mut request = Self::new(
            hosts.api_base(routing_region),
            routing::MATCHES_BY_PUUID,
            &[puuid, "ids"],
            EndpointFamily::Match.bucket(routing_region),
        );
        request.query = vec![
            ("start", start.to_string()),
            ("count", count.min(MAX_MATCH_IDS).to_string()),
        ];
        request
    }

    /// Match detail, on the routing cluster.
    pub fn match_detail(hosts: &UpstreamHosts, match_id: &str, region: &str) -> Self {
        let routing_region = Region::resolve(region).routing.as_str();
        Self::new(
            hosts.api_base(routing_region),
            routing::MATCH,
            &[match_id],
            EndpointFamily::Match.bucket(routing_region),
        )
    }

    /// Published game versions.
    pub fn versions(hosts: &UpstreamHosts) -> Self {
        Self::new(
            hosts.static_data.clone(),
            static_data::VERSIONS,
            &[],
            EndpointFamily::StaticData.bucket(""),
        )
    }

    /// Champion catalog for a concrete version.
    pub fn champion_catalog(hosts: &UpstreamHosts, version: &str) -> Self {
        let mut dynamic = vec![version];
        dynamic.extend_from_slice(static_data::CHAMPION_FILE);
        Self::new(
            hosts.static_data.clone(),
            static_data::CDN,
            &dynamic,
            EndpointFamily::StaticData.bucket(""),
        )
    }

    /// Build the request URL, percent-encoding every path segment.
    pub fn url(&self) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                GatewayError::InvalidArgument(format!("not a base URL: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(&self.segments);
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Encoded path, for logging and tests.
    pub fn path(&self) -> String {
        match self.url() {
            Ok(url) => url.path().to_string(),
            Err(_) => format!("/{}", self.segments.join("/")),
        }
    }
}
