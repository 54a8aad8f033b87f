use async_trait::async_trait;
use studio_gemini::GeminiLiveBackend;

use super::session::GeminiRealtimeSession;
use crate::config::LiveConfig;
use crate::error::{RealtimeError, Result};
use crate::model::RealtimeModel;
use crate::session::BoxedSession;

/// [`RealtimeModel`] for Gemini Live.
///
/// A blank API key is accepted here and rejected when a session opens, so a
/// missing credential surfaces as a session error rather than at startup.
#[derive(Debug, Clone)]
pub struct GeminiRealtimeModel {
    backend: GeminiLiveBackend,
}

impl GeminiRealtimeModel {
    pub fn new(backend: GeminiLiveBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl RealtimeModel for GeminiRealtimeModel {
    fn provider(&self) -> &str {
        "gemini"
    }

    async fn connect(&self, config: LiveConfig) -> Result<BoxedSession> {
        let GeminiLiveBackend::Studio { api_key } = &self.backend;
        if api_key.trim().is_empty() {
            return Err(RealtimeError::config("an API key is required to start a voice session"));
        }
        let session = GeminiRealtimeSession::connect(self.backend.clone(), config).await?;
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let model = GeminiRealtimeModel::new(GeminiLiveBackend::Studio { api_key: "  ".into() });
        let err = model.connect(LiveConfig::default()).await.err().unwrap();
        assert!(matches!(err, RealtimeError::ConfigError(_)));
    }
}
