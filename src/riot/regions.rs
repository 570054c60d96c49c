//! Region lookup table.
//!
//! Every short region code maps to two different upstream host groups:
//! a *platform* shard (summoner, league and per-shard data) and a *routing*
//! cluster (account and match data). They are distinct physical endpoints and
//! must not be swapped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Region code used when a caller supplies one that is not in the table.
pub const DEFAULT_REGION: &str = "na";

/// Regional routing cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingRegion {
    /// North and South America
    Americas,
    /// Korea and Japan
    Asia,
    /// Europe, Turkey and Russia
    Europe,
    /// Oceania and South East Asia
    Sea,
}

impl RoutingRegion {
    /// Host fragment for this cluster.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingRegion::Americas => "americas",
            RoutingRegion::Asia => "asia",
            RoutingRegion::Europe => "europe",
            RoutingRegion::Sea => "sea",
        }
    }
}

impl fmt::Display for RoutingRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the region table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Short code accepted from callers (e.g. `euw`).
    pub code: &'static str,
    /// Platform host fragment (e.g. `euw1`).
    pub platform: &'static str,
    /// Routing cluster.
    pub routing: RoutingRegion,
}

/// The fixed region table.
pub const REGIONS: &[Region] = &[
    Region { code: "na", platform: "na1", routing: RoutingRegion::Americas },
    Region { code: "euw", platform: "euw1", routing: RoutingRegion::Europe },
    Region { code: "eune", platform: "eun1", routing: RoutingRegion::Europe },
    Region { code: "kr", platform: "kr", routing: RoutingRegion::Asia },
    Region { code: "br", platform: "br1", routing: RoutingRegion::Americas },
    Region { code: "jp", platform: "jp1", routing: RoutingRegion::Asia },
    Region { code: "lan", platform: "la1", routing: RoutingRegion::Americas },
    Region { code: "las", platform: "la2", routing: RoutingRegion::Americas },
    Region { code: "oce", platform: "oc1", routing: RoutingRegion::Sea },
    Region { code: "tr", platform: "tr1", routing: RoutingRegion::Europe },
    Region { code: "ru", platform: "ru", routing: RoutingRegion::Europe },
];

impl Region {
    /// Look up a region code, case-insensitively.
    pub fn lookup(code: &str) -> Option<&'static Region> {
        let code = code.trim();
        REGIONS.iter().find(|r| r.code.eq_ignore_ascii_case(code))
    }

    /// Resolve a region code, falling back to [`DEFAULT_REGION`] for unknown codes.
    pub fn resolve(code: &str) -> &'static Region {
        Self::lookup(code).unwrap_or_else(|| {
            tracing::debug!("Unknown region {:?}, falling back to {}", code, DEFAULT_REGION);
            Self::default_region()
        })
    }

    /// The fallback region.
    pub fn default_region() -> &'static Region {
        &REGIONS[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_and_routing_differ() {
        let euw = Region::resolve("euw");
        assert_eq!(euw.platform, "euw1");
        assert_eq!(euw.routing, RoutingRegion::Europe);

        let oce = Region::resolve("oce");
        assert_eq!(oce.platform, "oc1");
        assert_eq!(oce.routing.as_str(), "sea");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Region::resolve("KR").platform, "kr");
        assert_eq!(Region::resolve(" Las ").platform, "la2");
    }

    #[test]
    fn test_unknown_region_falls_back() {
        assert!(Region::lookup("atlantis").is_none());
        let fallback = Region::resolve("atlantis");
        assert_eq!(fallback.code, DEFAULT_REGION);
        assert_eq!(fallback.platform, "na1");
        assert_eq!(fallback.routing, RoutingRegion::Americas);
    }

    #[test]
    fn test_default_region_is_in_table() {
        assert_eq!(Region::default_region().code, DEFAULT_REGION);
    }
}
