//! Gateway configuration.
//!
//! A [`GatewayConfig`] gathers everything needed to build the transport and
//! the gateway. Build one with [`GatewayConfig::builder`] or load it from the
//! environment with [`GatewayConfig::from_env`].
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `RIOT_API_KEY` | Riot API key | required |
//! | `RIOT_REQUEST_TIMEOUT_SECS` | Per-call timeout | `10` |
//! | `RIOT_DISPATCH_MODE` | `global` or `per-bucket` | `global` |

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{API_KEY_ENV_VAR, ApiKeyProvider, StaticApiKey};
use crate::error::GatewayError;
use crate::gateway::{DispatchMode, GatewayOptions, RetryPolicy};
use crate::rate_limit::RateLimitConfig;
use crate::riot::{DEFAULT_TIMEOUT, RiotClient, UpstreamHosts};

/// Environment variable holding the per-call timeout in seconds.
pub const TIMEOUT_ENV_VAR: &str = "RIOT_REQUEST_TIMEOUT_SECS";

/// Environment variable selecting the [`DispatchMode`].
pub const DISPATCH_MODE_ENV_VAR: &str = "RIOT_DISPATCH_MODE";

/// Settings for the transport, the rate limiter, retries and dispatch.
#[derive(Clone)]
pub struct GatewayConfig {
    /// API key source.
    pub api_key: Arc<dyn ApiKeyProvider>,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Custom user agent; the crate name and version when unset.
    pub user_agent: Option<String>,
    /// Dual-window limits.
    pub rate_limit: RateLimitConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
    /// Dispatch lane layout.
    pub dispatch: DispatchMode,
    /// Upstream addresses.
    pub hosts: UpstreamHosts,
}

impl GatewayConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// Load the configuration from environment variables.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GatewayError> {
        let api_key = lookup(API_KEY_ENV_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(GatewayError::MissingApiKey)?;

        let mut builder = Self::builder().api_key(Arc::new(StaticApiKey::new(api_key)));

        if let Some(secs) = lookup(TIMEOUT_ENV_VAR).and_then(|s| s.trim().parse::<u64>().ok()) {
            builder = builder.timeout(Duration::from_secs(secs.max(1)));
        }

        if let Some(mode) = lookup(DISPATCH_MODE_ENV_VAR) {
            builder = builder.dispatch(mode.parse()?);
        }

        builder.build()
    }

    /// Build the HTTP transport described by this configuration.
    pub fn build_client(&self) -> Result<RiotClient, GatewayError> {
        let mut builder = RiotClient::builder()
            .api_key(self.api_key.clone())
            .hosts(self.hosts.clone())
            .timeout(self.timeout);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder.build()
    }

    /// Queue, retry and rate-limit settings.
    pub fn gateway_options(&self) -> GatewayOptions {
        GatewayOptions {
            rate_limit: self.rate_limit.clone(),
            retry: self.retry.clone(),
            dispatch: self.dispatch,
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", self.api_key.api_key())
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("rate_limit", &self.rate_limit)
            .field("retry", &self.retry)
            .field("dispatch", &self.dispatch)
            .field("hosts", &self.hosts)
            .finish()
    }
}

/// Builder for [`GatewayConfig`].
pub struct GatewayConfigBuilder {
    api_key: Option<Arc<dyn ApiKeyProvider>>,
    timeout: Duration,
    user_agent: Option<String>,
    rate_limit: RateLimitConfig,
    retry: RetryPolicy,
    dispatch: DispatchMode,
    hosts: UpstreamHosts,
}

impl Default for GatewayConfigBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            rate_limit: RateLimitConfig::default(),
            retry: RetryPolicy::default(),
            dispatch: DispatchMode::default(),
            hosts: UpstreamHosts::default(),
        }
    }
}

impl GatewayConfigBuilder {
    /// Set the API key provider.
    pub fn api_key(mut self, api_key: Arc<dyn ApiKeyProvider>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the rate-limit windows.
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Set the retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the dispatch mode.
    pub fn dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Point every upstream call at other hosts (a mock server in tests).
    pub fn hosts(mut self, hosts: UpstreamHosts) -> Self {
        self.hosts = hosts;
        self
    }

    /// Finish the configuration. Fails without an API key.
    pub fn build(self) -> Result<GatewayConfig, GatewayError> {
        Ok(GatewayConfig {
            api_key: self.api_key.ok_or(GatewayError::MissingApiKey)?,
            timeout: self.timeout,
            user_agent: self.user_agent,
            rate_limit: self.rate_limit,
            retry: self.retry,
            dispatch: self.dispatch,
            hosts: self.hosts,
        })
    }
}
