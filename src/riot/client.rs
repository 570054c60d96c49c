//! HTTP transport for the Riot API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;

use crate::auth::ApiKeyProvider;
use crate::error::{ApiError, GatewayError};
use crate::riot::endpoints::{API_KEY_HEADER, UpstreamHosts};
use crate::riot::request::UpstreamRequest;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Performs single upstream GETs and classifies their failures.
///
/// This client does no rate limiting and no retrying; [`RiotGateway`]
/// layers both on top.
///
/// [`RiotGateway`]: crate::gateway::RiotGateway
///
/// # Example
///
/// ```rust,no_run
/// use riot_gateway::auth::StaticApiKey;
/// use riot_gateway::riot::{RiotClient, UpstreamRequest};
/// use riot_gateway::riot::types::Account;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RiotClient::builder()
///         .api_key(Arc::new(StaticApiKey::new("RGAPI-...")))
///         .build()?;
///
///     let request = UpstreamRequest::account_by_riot_id(client.hosts(), "Faker", "KR1", "kr");
///     let account: Account = client.execute(&request).await?;
///     println!("PUUID: {}", account.puuid);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RiotClient {
    http_client: ClientWithMiddleware,
    hosts: UpstreamHosts,
    timeout: Duration,
}

impl RiotClient {
    /// Create a new client builder.
    pub fn builder() -> RiotClientBuilder {
        RiotClientBuilder::new()
    }

    /// Host addresses requests are built against.
    pub fn hosts(&self) -> &UpstreamHosts {
        &self.hosts
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Perform one GET and decode the JSON body.
    ///
    /// 429 and 503 map to the transient error variants, other non-success
    /// statuses to [`GatewayError::Api`], and an elapsed timeout to
    /// [`GatewayError::Timeout`].
    pub async fn execute<T>(&self, request: &UpstreamRequest) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let url = request.url()?;
        tracing::debug!("GET {} [{}]", url.path(), request.bucket);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;
        self.parse_response(response).await
    }

    /// Parse a response from the Riot API.
    async fn parse_response<T>(&self, response: reqwest::Response) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            return Err(GatewayError::RateLimitExceeded { retry_after_secs });
        }
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(GatewayError::ServiceUnavailable);
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::Http(e)
            }
        })?;

        if !status.is_success() {
            return Err(GatewayError::Api(ApiError::from_body(status.as_u16(), &body)));
        }

        serde_json::from_str(&body).map_err(|e| {
            GatewayError::InvalidResponse(format!("Failed to parse response: {}. Body: {}", e, body))
        })
    }
}

impl std::fmt::Debug for RiotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiotClient")
            .field("hosts", &self.hosts)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`RiotClient`].
pub struct RiotClientBuilder {
    hosts: UpstreamHosts,
    api_key: Option<Arc<dyn ApiKeyProvider>>,
    user_agent: Option<String>,
    timeout: Duration,
}

impl RiotClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            hosts: UpstreamHosts::default(),
            api_key: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the upstream hosts (useful for testing with a mock server).
    pub fn hosts(mut self, hosts: UpstreamHosts) -> Self {
        self.hosts = hosts;
        self
    }

    /// Set the API key provider.
    pub fn api_key(mut self, api_key: Arc<dyn ApiKeyProvider>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// Fails if no API key was given or the key is not a valid header value.
    pub fn build(self) -> Result<RiotClient, GatewayError> {
        let api_key = self.api_key.ok_or(GatewayError::MissingApiKey)?;

        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("riot-gateway/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("riot-gateway"));
        headers.insert(USER_AGENT, header_value);

        let mut key_value = HeaderValue::from_str(api_key.api_key().expose_secret())
            .map_err(|_| {
                GatewayError::InvalidArgument("API key is not a valid header value".to_string())
            })?;
        key_value.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(RiotClient {
            http_client: client,
            hosts: self.hosts,
            timeout: self.timeout,
        })
    }
}

impl Default for RiotClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
