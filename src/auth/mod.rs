//! Authentication for the Riot API.
//!
//! The Riot developer API authenticates with a single key sent on every
//! request; this module keeps it out of logs and debug output.

mod api_key;

pub use api_key::{API_KEY_ENV_VAR, ApiKey, ApiKeyProvider, EnvApiKey, StaticApiKey};
