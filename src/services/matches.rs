//! Match history and match records.

use std::sync::Arc;

use crate::cache::{DataClass, ReadThroughCache, keys};
use crate::error::GatewayError;
use crate::riot::types::MatchDto;
use crate::riot::{MAX_MATCH_IDS, RiotApi, Region};
use crate::services::require_param;

/// Largest page served with full match records.
pub const MAX_DETAILED_MATCHES: u32 = 20;

/// Default page size for match history.
pub const DEFAULT_MATCH_COUNT: u32 = 20;

/// Cached match id pages and match records.
pub struct MatchService<A> {
    api: Arc<A>,
    cache: ReadThroughCache,
}

impl<A> Clone for MatchService<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<A: RiotApi> MatchService<A> {
    /// Service over `api`, caching through `cache`.
    pub fn new(api: Arc<A>, cache: ReadThroughCache) -> Self {
        Self { api, cache }
    }

    /// A page of match ids, newest first. `count` is clamped to 1..=100.
    pub async fn get_match_history(
        &self,
        puuid: &str,
        region: &str,
        start: u32,
        count: u32,
    ) -> Result<Vec<String>, GatewayError> {
        require_param("puuid", puuid)?;
        let region = Region::resolve(region).code;
        let count = count.clamp(1, MAX_MATCH_IDS);
        let key = keys::match_ids(region, puuid, start, count);
        self.cache
            .fetch(&key, DataClass::MatchHistory, || {
                self.api.get_match_ids(puuid, region, start, count)
            })
            .await
    }

    /// A full match record. Completed matches never change, so these live longest.
    pub async fn get_match_details(
        &self,
        match_id: &str,
        region: &str,
    ) -> Result<MatchDto, GatewayError> {
        require_param("matchId", match_id)?;
        let key = keys::match_detail(match_id);
        self.cache
            .fetch(&key, DataClass::MatchDetail, || self.api.get_match(match_id, region))
            .await
    }

    /// Fetch several match records in order, skipping any that fail.
    pub async fn get_multiple_match_details(
        &self,
        match_ids: &[String],
        region: &str,
    ) -> Vec<MatchDto> {
        let mut matches = Vec::with_capacity(match_ids.len());
        for match_id in match_ids {
            match self.get_match_details(match_id, region).await {
                Ok(record) => matches.push(record),
                Err(e) => tracing::warn!(match_id = %match_id, error = %e, "Skipping match"),
            }
        }
        matches
    }

    /// A page of history with full records. `count` is clamped to 1..=20.
    pub async fn get_match_history_with_details(
        &self,
        puuid: &str,
        region: &str,
        start: u32,
        count: u32,
    ) -> Result<Vec<MatchDto>, GatewayError> {
        require_param("puuid", puuid)?;
        let count = count.clamp(1, MAX_DETAILED_MATCHES);
        let match_ids = self.get_match_history(puuid, region, start, count).await?;
        Ok(self.get_multiple_match_details(&match_ids, region).await)
    }

    /// Drop every cached history page of a player.
    pub async fn invalidate_matches(&self, puuid: &str, region: &str) {
        let region = Region::resolve(region).code;
        self.cache
            .invalidate_pattern(&keys::match_ids_pattern(region, puuid))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CachePort, InMemoryCache};
    use crate::services::fake::FakeApi;
    use std::time::Duration;

    fn service(api: FakeApi) -> (Arc<FakeApi>, Arc<InMemoryCache>, MatchService<FakeApi>) {
        let api = Arc::new(api);
        let store = Arc::new(InMemoryCache::new());
        let service = MatchService::new(api.clone(), ReadThroughCache::new(store.clone()));
        (api, store, service)
    }

    #[tokio::test]
    async fn test_history_count_is_clamped() {
        let (api, store, service) = service(FakeApi::new());

        let ids = service.get_match_history("p1", "na", 0, 500).await.unwrap();
        assert_eq!(ids.len(), 100);
        assert_eq!(*api.requested_counts.lock().unwrap(), vec![100]);
        assert!(store.exists("matches:na:p1:0:100").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_detail_ttl() {
        let (_api, store, service) = service(FakeApi::new());

        service.get_match_details("NA1_1", "na").await.unwrap();
        assert_eq!(
            store.ttl("match:NA1_1").await,
            Some(Duration::from_secs(7 * 24 * 60 * 60))
        );
    }

    #[tokio::test]
    async fn test_failed_matches_are_skipped() {
        let mut api = FakeApi::new();
        api.missing_matches.insert("NA1_1".to_string());
        let (_api, _store, service) = service(api);

        let ids: Vec<String> = ["NA1_0", "NA1_1", "NA1_2"].map(String::from).to_vec();
        let matches = service.get_multiple_match_details(&ids, "na").await;

        let fetched: Vec<&str> = matches.iter().map(|m| m.metadata.match_id.as_str()).collect();
        assert_eq!(fetched, vec!["NA1_0", "NA1_2"]);
    }

    #[tokio::test]
    async fn test_history_with_details_is_clamped() {
        let (api, _store, service) = service(FakeApi::new());

        let matches = service
            .get_match_history_with_details("p1", "na", 0, 50)
            .await
            .unwrap();
        assert_eq!(matches.len(), 20);
        assert_eq!(*api.requested_counts.lock().unwrap(), vec![20]);
    }

    #[tokio::test]
    async fn test_blank_identifiers_are_rejected() {
        let (api, store, service) = service(FakeApi::new());

        let history = service.get_match_history("", "na", 0, 20).await;
        assert!(matches!(history, Err(GatewayError::InvalidArgument(_))));
        let details = service.get_match_details("", "na").await;
        assert!(matches!(details, Err(GatewayError::InvalidArgument(_))));
        let with_details = service.get_match_history_with_details(" ", "na", 0, 20).await;
        assert!(matches!(with_details, Err(GatewayError::InvalidArgument(_))));

        assert_eq!(api.calls(), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_matches() {
        let (api, store, service) = service(FakeApi::new());

        service.get_match_history("p1", "na", 0, 10).await.unwrap();
        service.get_match_history("p1", "na", 10, 10).await.unwrap();
        service.get_match_details("NA1_0", "na").await.unwrap();
        service.invalidate_matches("p1", "NA").await;

        assert!(!store.exists("matches:na:p1:0:10").await);
        assert!(!store.exists("matches:na:p1:10:10").await);
        assert!(store.exists("match:NA1_0").await);

        service.get_match_history("p1", "na", 0, 10).await.unwrap();
        assert_eq!(api.calls(), 4);
    }
}
