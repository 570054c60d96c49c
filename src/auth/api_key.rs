//! API key management for the Riot developer API.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::error::GatewayError;

/// Default environment variable holding the API key.
pub const API_KEY_ENV_VAR: &str = "RIOT_API_KEY";

/// A Riot API key, sent as the `X-Riot-Token` header.
#[derive(Clone)]
pub struct ApiKey {
    key: SecretString,
}

impl ApiKey {
    /// Wrap a raw API key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: SecretString::from(key.into()),
        }
    }

    /// Get the raw key for building the request header.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.key.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey").field("key", &"[REDACTED]").finish()
    }
}

/// Trait for providing the API key.
///
/// Implement this trait to customize how the key is retrieved,
/// for example from a secrets manager.
pub trait ApiKeyProvider: Send + Sync {
    /// Get the API key.
    fn api_key(&self) -> &ApiKey;
}

/// Provider that holds the key directly.
#[derive(Clone, Debug)]
pub struct StaticApiKey {
    key: ApiKey,
}

impl StaticApiKey {
    /// Create a new static key provider.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: ApiKey::new(key) }
    }
}

impl ApiKeyProvider for StaticApiKey {
    fn api_key(&self) -> &ApiKey {
        &self.key
    }
}

impl ApiKeyProvider for Arc<StaticApiKey> {
    fn api_key(&self) -> &ApiKey {
        &self.key
    }
}

/// Provider that reads the key from the environment.
///
/// By default, reads from `RIOT_API_KEY`.
#[derive(Debug)]
pub struct EnvApiKey {
    key: ApiKey,
}

impl EnvApiKey {
    /// Read the key from `RIOT_API_KEY`.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_env_var(API_KEY_ENV_VAR)
    }

    /// Read the key from a custom environment variable.
    ///
    /// Unset and blank values are both reported as [`GatewayError::MissingApiKey`].
    pub fn from_env_var(var: &str) -> Result<Self, GatewayError> {
        Self::try_from_env_var(var).ok_or(GatewayError::MissingApiKey)
    }

    /// Try to read the key from `RIOT_API_KEY`.
    pub fn try_from_env() -> Option<Self> {
        Self::try_from_env_var(API_KEY_ENV_VAR)
    }

    /// Try to read the key from a custom environment variable.
    pub fn try_from_env_var(var: &str) -> Option<Self> {
        let key = std::env::var(var).ok()?;
        if key.trim().is_empty() {
            return None;
        }
        Some(Self { key: ApiKey::new(key.trim()) })
    }
}

impl ApiKeyProvider for EnvApiKey {
    fn api_key(&self) -> &ApiKey {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_debug_redacted() {
        let key = ApiKey::new("RGAPI-super-secret");
        let debug_str = format!("{:?}", key);
        assert!(!debug_str.contains("RGAPI-super-secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_static_api_key() {
        let provider = StaticApiKey::new("RGAPI-123");
        assert_eq!(provider.api_key().expose_secret(), "RGAPI-123");
    }

    #[test]
    fn test_env_api_key_missing() {
        let result = EnvApiKey::from_env_var("RIOT_GATEWAY_TEST_UNSET_KEY");
        assert!(matches!(result, Err(GatewayError::MissingApiKey)));
    }
}
