//! Session factory seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::audio::AudioFormat;
use crate::config::LiveConfig;
use crate::error::Result;
use crate::session::BoxedSession;

/// Opens [`RealtimeSession`](crate::session::RealtimeSession)s and states
/// the audio formats they speak.
#[async_trait]
pub trait RealtimeModel: Send + Sync {
    /// Short provider name for logs, e.g. `gemini`.
    fn provider(&self) -> &str;

    /// Format expected for microphone frames.
    fn input_format(&self) -> AudioFormat {
        AudioFormat::pcm16_16khz()
    }

    /// Format of audio deltas from the server.
    fn output_format(&self) -> AudioFormat {
        AudioFormat::pcm16_24khz()
    }

    /// Connect and declare `config`. Resolves once the setup is sent.
    async fn connect(&self, config: LiveConfig) -> Result<BoxedSession>;
}

pub type BoxedModel = Arc<dyn RealtimeModel>;
