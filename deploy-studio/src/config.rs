//! Runtime configuration.

use secrecy::{ExposeSecret, SecretString};
use studio_gemini::GeminiLiveBackend;
use url::Url;

use crate::error::StudioError;

/// Environment variables consulted for the API key, in order.
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY", "GOOGLE_API_KEY"];

/// Optional override of the REST base URL (e.g. a proxy).
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

/// Explicit configuration passed to every orchestrator and the voice session.
///
/// The credential is optional here: a missing key fails each call with a
/// configuration error instead of failing at startup.
#[derive(Debug, Clone, Default)]
pub struct StudioConfig {
    pub api_key: Option<SecretString>,
    pub base_url: Option<Url>,
}

impl StudioConfig {
    /// Read configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, StudioError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StudioError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .map(SecretString::from);

        let base_url = match lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(Url::parse(raw.trim()).map_err(|e| {
                StudioError::Config(format!("{BASE_URL_VAR} is not a valid URL: {e}"))
            })?),
            None => None,
        };

        Ok(Self { api_key, base_url })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key =
            if api_key.trim().is_empty() { None } else { Some(SecretString::from(api_key)) };
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// The API key, or a configuration error naming the variables to set.
    pub fn require_api_key(&self) -> Result<&str, StudioError> {
        self.api_key.as_ref().map(|key| key.expose_secret()).ok_or_else(|| {
            StudioError::Config(format!("API key is missing; set {}", API_KEY_VARS.join(" or ")))
        })
    }

    /// Live websocket backend. A missing key yields an empty one, which the
    /// live model rejects when a session opens.
    pub fn live_backend(&self) -> GeminiLiveBackend {
        GeminiLiveBackend::Studio {
            api_key: self
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().to_string())
                .unwrap_or_default(),
        }
    }
}
