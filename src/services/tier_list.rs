//! Placeholder tier list.
//!
//! There is no match aggregation behind these numbers. Each champion gets a
//! base rate that falls with its catalog position plus uniform jitter, and
//! the list is then ordered by win rate.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::riot::types::ChampionData;

/// Champions listed per role.
pub const TIER_LIST_SIZE: usize = 15;

/// A lane role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::Adc => "adc",
            Role::Support => "support",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                GatewayError::InvalidArgument(format!(
                    "Invalid role: {s}. Must be one of: top, jungle, mid, adc, support"
                ))
            })
    }
}

/// Tier letter, assigned by catalog position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    pub fn for_position(index: usize) -> Self {
        match index {
            0..3 => Tier::S,
            3..6 => Tier::A,
            6..9 => Tier::B,
            9..12 => Tier::C,
            _ => Tier::D,
        }
    }
}

/// One row of a tier list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionStats {
    /// Numeric catalog key
    pub champion_id: String,
    pub champion_name: String,
    pub role: Role,
    pub win_rate: f64,
    pub pick_rate: f64,
    pub ban_rate: f64,
    pub games_played: u32,
    pub tier: Tier,
}

/// Build a tier list from the first [`TIER_LIST_SIZE`] catalog champions.
pub fn generate_tier_list<R: Rng>(
    catalog: &ChampionData,
    role: Role,
    rng: &mut R,
) -> Vec<ChampionStats> {
    let mut stats: Vec<ChampionStats> = catalog
        .data
        .values()
        .take(TIER_LIST_SIZE)
        .enumerate()
        .map(|(index, champion)| {
            let i = index as f64;
            ChampionStats {
                champion_id: champion.key.clone(),
                champion_name: champion.name.clone(),
                role,
                win_rate: (52.0 - i * 0.5 + rng.gen_range(-2.0..2.0)).max(45.0),
                pick_rate: (15.0 - i * 0.8 + rng.gen_range(-1.0..1.0)).max(1.0),
                ban_rate: (20.0 - i * 1.2 + rng.gen_range(-1.5..1.5)).max(0.0),
                games_played: rng.gen_range(5000..15000),
                tier: Tier::for_position(index),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
    stats
}
