//! Error types for the Riot gateway.

use thiserror::Error;

/// The main error type for all gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// The Riot API returned a non-retryable error status
    #[error("Riot API error: {0}")]
    Api(ApiError),

    /// Upstream rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded, retry after {retry_after_secs:?}s")]
    RateLimitExceeded {
        /// Value of the `Retry-After` header, in seconds
        retry_after_secs: Option<u64>,
    },

    /// Upstream temporarily unavailable (HTTP 503)
    #[error("Service unavailable")]
    ServiceUnavailable,

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// The caller supplied an argument the gateway refuses before any upstream call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No API key configured
    #[error("Missing API key: set RIOT_API_KEY")]
    MissingApiKey,

    /// The request queue has been shut down
    #[error("Gateway is shut down")]
    GatewayClosed,

    /// A queued request finished without producing a result
    #[error("Queued request was dropped before completing")]
    RequestDropped,
}

impl GatewayError {
    /// HTTP status code a routing layer should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Api(api) => api.status,
            GatewayError::RateLimitExceeded { .. } => 429,
            GatewayError::ServiceUnavailable => 503,
            GatewayError::Timeout => 504,
            GatewayError::InvalidArgument(_) => 400,
            _ => 500,
        }
    }

    /// Whether the retry policy treats this error as transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimitExceeded { .. } | GatewayError::ServiceUnavailable
        )
    }

    /// Whether this is an upstream 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Api(api) if api.is_not_found())
    }

    /// Map a transport failure, surfacing timeouts as [`GatewayError::Timeout`].
    pub(crate) fn from_transport(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => GatewayError::Timeout,
            other => GatewayError::HttpMiddleware(other),
        }
    }
}

/// A non-retryable error status returned by the Riot API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Message from the response body (or the raw body)
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    status: ErrorStatus,
}

#[derive(serde::Deserialize)]
struct ErrorStatus {
    message: String,
}

impl ApiError {
    /// Create a new API error from status and message.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Parse the Riot error envelope.
    ///
    /// Riot returns errors as `{"status": {"message": "...", "status_code": 404}}`.
    /// Anything else is kept verbatim.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::new(status, envelope.status.message),
            Err(_) => Self::new(status, body.trim()),
        }
    }

    /// Check if this is a bad request error.
    pub fn is_bad_request(&self) -> bool {
        self.status == 400
    }

    /// Check if the API key was rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Check if the API key lacks access (often an expired development key).
    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    /// Check if the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Human-facing message for this status.
    pub fn user_message(&self) -> &str {
        match self.status {
            400 => "Invalid request parameters",
            401 => "Unauthorized - Invalid API key",
            403 => "Forbidden - API key may have expired or lacks permissions",
            404 => "Resource not found",
            429 => "Rate limit exceeded - Please try again later",
            500 | 502 | 503 | 504 => "External service temporarily unavailable",
            _ => &self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_envelope() {
        let body = r#"{"status":{"message":"Data not found - match file not found","status_code":404}}"#;
        let error = ApiError::from_body(404, body);
        assert_eq!(error.status, 404);
        assert_eq!(error.message, "Data not found - match file not found");
        assert!(error.is_not_found());
        assert_eq!(error.user_message(), "Resource not found");
    }

    #[test]
    fn test_api_error_from_plain_body() {
        let error = ApiError::from_body(418, "  teapot\n");
        assert_eq!(error.message, "teapot");
        assert_eq!(error.user_message(), "teapot");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GatewayError::InvalidArgument("role".into()).status_code(), 400);
        assert_eq!(GatewayError::Timeout.status_code(), 504);
        assert_eq!(GatewayError::Api(ApiError::new(403, "Forbidden")).status_code(), 403);
        assert_eq!(GatewayError::GatewayClosed.status_code(), 500);
    }

    #[test]
    fn test_transient_classes() {
        assert!(GatewayError::ServiceUnavailable.is_transient());
        assert!(GatewayError::RateLimitExceeded { retry_after_secs: Some(1) }.is_transient());
        assert!(!GatewayError::Timeout.is_transient());
        assert!(!GatewayError::Api(ApiError::new(404, "missing")).is_transient());
    }
}
