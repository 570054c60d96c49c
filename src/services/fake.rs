//! Canned [`RiotApi`] for service tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{ApiError, GatewayError};
use crate::riot::RiotApi;
use crate::riot::types::{
    Account, Champion, ChampionData, LeagueEntry, MatchDto, MatchInfo, MatchMetadata, Summoner,
};

#[derive(Default)]
pub(crate) struct FakeApi {
    pub calls: AtomicUsize,
    pub missing_matches: HashSet<String>,
    pub requested_counts: Mutex<Vec<u32>>,
    pub champion_count: usize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            champion_count: 20,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) fn match_dto(match_id: &str) -> MatchDto {
    MatchDto {
        metadata: MatchMetadata {
            data_version: "2".to_string(),
            match_id: match_id.to_string(),
            participants: vec!["p1".to_string()],
        },
        info: MatchInfo {
            game_creation: 1_700_000_000_000,
            game_duration: 1800,
            game_mode: "CLASSIC".to_string(),
            queue_id: 420,
            participants: Vec::new(),
            extra: BTreeMap::new(),
        },
    }
}

pub(crate) fn catalog(count: usize) -> ChampionData {
    let data = (0..count)
        .map(|i| {
            let id = format!("Champ{i:02}");
            let champion = Champion {
                id: id.clone(),
                key: (100 + i).to_string(),
                name: format!("Champion {i}"),
                title: String::new(),
                tags: vec!["Fighter".to_string()],
                extra: BTreeMap::new(),
            };
            (id, champion)
        })
        .collect();

    ChampionData {
        data_type: "champion".to_string(),
        format: "standAloneComplex".to_string(),
        version: "14.1.1".to_string(),
        data,
    }
}

impl RiotApi for FakeApi {
    async fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
        _region: &str,
    ) -> Result<Account, GatewayError> {
        self.hit();
        Ok(Account {
            puuid: format!("puuid-{game_name}"),
            game_name: Some(game_name.to_string()),
            tag_line: Some(tag_line.to_string()),
        })
    }

    async fn get_summoner_by_puuid(
        &self,
        puuid: &str,
        _region: &str,
    ) -> Result<Summoner, GatewayError> {
        self.hit();
        Ok(Summoner {
            id: format!("sid-{puuid}"),
            account_id: None,
            puuid: puuid.to_string(),
            profile_icon_id: 1,
            revision_date: 0,
            summoner_level: 30,
            extra: BTreeMap::new(),
        })
    }

    async fn get_league_entries(
        &self,
        _summoner_id: &str,
        _region: &str,
    ) -> Result<Vec<LeagueEntry>, GatewayError> {
        self.hit();
        Ok(Vec::new())
    }

    async fn get_match_ids(
        &self,
        _puuid: &str,
        _region: &str,
        start: u32,
        count: u32,
    ) -> Result<Vec<String>, GatewayError> {
        self.hit();
        if let Ok(mut counts) = self.requested_counts.lock() {
            counts.push(count);
        }
        Ok((start..start + count).map(|i| format!("NA1_{i}")).collect())
    }

    async fn get_match(&self, match_id: &str, _region: &str) -> Result<MatchDto, GatewayError> {
        self.hit();
        if self.missing_matches.contains(match_id) {
            return Err(GatewayError::Api(ApiError::new(404, "Data not found")));
        }
        Ok(match_dto(match_id))
    }

    async fn get_champion_data(&self, _version: &str) -> Result<ChampionData, GatewayError> {
        self.hit();
        Ok(catalog(self.champion_count))
    }

    async fn get_latest_version(&self) -> Result<String, GatewayError> {
        self.hit();
        Ok("14.1.1".to_string())
    }
}
