//! Request orchestrators.
//!
//! Each operation validates its input, builds one `generateContent`
//! request, sends it and maps the response into a typed result. There is no
//! shared mutable state between calls and no retry.

mod generate;
mod research;
mod speech;

use std::sync::Arc;

use secrecy::ExposeSecret;
use studio_gemini::GeminiClient;
use studio_gemini::backend::GeminiBackend;

use crate::config::StudioConfig;
use crate::error::{Result, StudioError};

pub use generate::{GenerationMode, ModeSettings, SYSTEM_INSTRUCTION};
pub use research::{RESEARCH_MODEL, ResearchResult, Source};
pub use speech::{SPEECH_MODEL, SPEECH_VOICE, SpeechAudio};

/// Entry point for generation, research and speech calls.
#[derive(Debug, Clone)]
pub struct Studio {
    config: StudioConfig,
    client: Option<GeminiClient>,
}

impl Studio {
    /// Build a studio over the AI Studio REST API.
    ///
    /// Without an API key this still succeeds; each call then fails with
    /// [`StudioError::Config`].
    pub fn new(config: StudioConfig) -> Result<Self> {
        let client = match &config.api_key {
            Some(key) => {
                let mut builder = GeminiClient::builder(key.expose_secret());
                if let Some(base_url) = &config.base_url {
                    builder = builder.with_base_url(base_url.clone());
                }
                Some(builder.build()?)
            }
            None => None,
        };
        Ok(Self { config, client })
    }

    /// Build a studio over an arbitrary backend, e.g. a mock.
    pub fn with_backend(config: StudioConfig, backend: Arc<dyn GeminiBackend>) -> Self {
        Self { config, client: Some(GeminiClient::with_backend(backend)) }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    fn client(&self) -> Result<&GeminiClient> {
        self.client.as_ref().ok_or_else(|| match self.config.require_api_key() {
            Err(e) => e,
            Ok(_) => StudioError::Config("Gemini client is not initialised".to_string()),
        })
    }
}

/// Trimmed input, or [`StudioError::InvalidInput`] when blank.
fn require_text<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(StudioError::InvalidInput(format!("Please enter a {what}.")))
    } else {
        Ok(trimmed)
    }
}
