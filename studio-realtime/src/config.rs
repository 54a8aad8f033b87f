//! Configuration for a live voice session.

use serde::{Deserialize, Serialize};
use studio_gemini::Modality;

/// Live model used for brainstorming sessions.
pub const DEFAULT_LIVE_MODEL: &str = "models/gemini-2.5-flash-native-audio-preview-09-2025";

/// Prebuilt voice the assistant speaks with.
pub const DEFAULT_VOICE: &str = "Zephyr";

/// Persona given to the live assistant.
pub const DEFAULT_INSTRUCTION: &str = "You are a helpful Python coding assistant. \
Help the user brainstorm app ideas. Keep answers concise.";

/// Settings declared to the model when a session opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Model identifier (with the `models/` prefix).
    pub model: String,
    /// System instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    /// Prebuilt voice name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Response modalities; audio only for voice sessions.
    pub modalities: Vec<Modality>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_LIVE_MODEL.to_string(),
            instruction: Some(DEFAULT_INSTRUCTION.to_string()),
            voice: Some(DEFAULT_VOICE.to_string()),
            modalities: vec![Modality::Audio],
        }
    }
}
