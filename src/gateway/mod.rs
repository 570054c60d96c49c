//! The rate-limited request gateway.
//!
//! [`RiotGateway`] routes every upstream call through three layers:
//!
//! 1. the [`RequestQueue`], which dispatches calls in arrival order,
//! 2. the [`RetryPolicy`], which re-runs 429/503 answers a bounded number of times,
//! 3. the [`BucketRateLimiter`], consulted before every attempt.
//!
//! ```rust,no_run
//! use riot_gateway::gateway::RiotGateway;
//! use riot_gateway::config::GatewayConfig;
//! use riot_gateway::riot::RiotApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = RiotGateway::from_config(&GatewayConfig::from_env()?)?;
//!     let account = gateway.get_account_by_riot_id("Faker", "KR1", "kr").await?;
//!     let ids = gateway.get_match_ids(&account.puuid, "kr", 0, 5).await?;
//!     println!("{ids:?}");
//!     gateway.shutdown().await;
//!     Ok(())
//! }
//! ```

mod queue;
mod retry;

pub use queue::{DispatchMode, RequestQueue};
pub use retry::RetryPolicy;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::rate_limit::{BucketRateLimiter, RateLimitConfig};
use crate::riot::types::{Account, ChampionData, LeagueEntry, MatchDto, Summoner};
use crate::riot::{LATEST_VERSION, RiotApi, RiotClient, UpstreamRequest};

/// Queue, retry and rate-limit settings for a [`RiotGateway`].
#[derive(Debug, Clone, Default)]
pub struct GatewayOptions {
    /// Dual-window limits applied to every bucket.
    pub rate_limit: RateLimitConfig,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
    /// How queued calls are spread over dispatch loops.
    pub dispatch: DispatchMode,
}

/// Rate-limited, queued access to the Riot API.
///
/// Cloning is cheap; clones share one queue and one set of rate windows.
#[derive(Clone)]
pub struct RiotGateway {
    client: RiotClient,
    limiter: Arc<BucketRateLimiter>,
    retry: RetryPolicy,
    queue: Arc<RequestQueue>,
}

impl RiotGateway {
    /// Wrap a transport with the given options.
    pub fn new(client: RiotClient, options: GatewayOptions) -> Self {
        Self {
            client,
            limiter: Arc::new(BucketRateLimiter::new(options.rate_limit)),
            retry: options.retry,
            queue: Arc::new(RequestQueue::new(options.dispatch)),
        }
    }

    /// Build the transport and gateway from a configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self::new(config.build_client()?, config.gateway_options()))
    }

    /// Get the underlying transport.
    pub fn client(&self) -> &RiotClient {
        &self.client
    }

    /// Get the shared rate limiter.
    pub fn limiter(&self) -> &BucketRateLimiter {
        &self.limiter
    }

    /// Get the request queue.
    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    /// Get the retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Stop accepting calls and wait for queued ones to finish.
    pub async fn shutdown(&self) {
        self.queue.shutdown().await;
    }

    /// Queue one upstream GET and decode its body.
    async fn call<T>(&self, request: UpstreamRequest) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.client.clone();
        let limiter = self.limiter.clone();
        let retry = self.retry.clone();

        self.queue
            .submit(request.bucket.clone(), move || async move {
                retry
                    .run(&limiter, &request.bucket, || client.execute::<T>(&request))
                    .await
            })
            .await
    }
}

impl std::fmt::Debug for RiotGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiotGateway")
            .field("client", &self.client)
            .field("rate_limit", self.limiter.config())
            .field("retry", &self.retry)
            .field("queue", &self.queue)
            .finish()
    }
}

/// Resolve the newest version, then fetch its catalog.
async fn fetch_latest_catalog(client: &RiotClient) -> Result<ChampionData, GatewayError> {
    let version = latest_version(client).await?;
    client
        .execute(&UpstreamRequest::champion_catalog(client.hosts(), &version))
        .await
}

async fn latest_version(client: &RiotClient) -> Result<String, GatewayError> {
    let versions = client
        .execute(&UpstreamRequest::versions(client.hosts()))
        .await?;
    newest(versions)
}

/// Data Dragon lists versions newest first.
fn newest(versions: Vec<String>) -> Result<String, GatewayError> {
    versions
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::InvalidResponse("Empty version list".to_string()))
}

impl RiotApi for RiotGateway {
    async fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> Result<Account, GatewayError> {
        let request =
            UpstreamRequest::account_by_riot_id(self.client.hosts(), game_name, tag_line, region);
        self.call(request).await
    }

    async fn get_summoner_by_puuid(
        &self,
        puuid: &str,
        region: &str,
    ) -> Result<Summoner, GatewayError> {
        self.call(UpstreamRequest::summoner_by_puuid(self.client.hosts(), puuid, region))
            .await
    }

    async fn get_league_entries(
        &self,
        summoner_id: &str,
        region: &str,
    ) -> Result<Vec<LeagueEntry>, GatewayError> {
        self.call(UpstreamRequest::league_entries(self.client.hosts(), summoner_id, region))
            .await
    }

    async fn get_match_ids(
        &self,
        puuid: &str,
        region: &str,
        start: u32,
        count: u32,
    ) -> Result<Vec<String>, GatewayError> {
        self.call(UpstreamRequest::match_ids(self.client.hosts(), puuid, region, start, count))
            .await
    }

    async fn get_match(&self, match_id: &str, region: &str) -> Result<MatchDto, GatewayError> {
        self.call(UpstreamRequest::match_detail(self.client.hosts(), match_id, region))
            .await
    }

    async fn get_champion_data(&self, version: &str) -> Result<ChampionData, GatewayError> {
        if !version.eq_ignore_ascii_case(LATEST_VERSION) {
            return self
                .call(UpstreamRequest::champion_catalog(self.client.hosts(), version))
                .await;
        }

        // Both lookups run inside one queue entry so the pair stays in order.
        let client = self.client.clone();
        let limiter = self.limiter.clone();
        let retry = self.retry.clone();
        let bucket = UpstreamRequest::versions(client.hosts()).bucket;

        self.queue
            .submit(bucket.clone(), move || async move {
                retry
                    .run(&limiter, &bucket, || fetch_latest_catalog(&client))
                    .await
            })
            .await
    }

    async fn get_latest_version(&self) -> Result<String, GatewayError> {
        let versions = self
            .call(UpstreamRequest::versions(self.client.hosts()))
            .await?;
        newest(versions)
    }
}
