//! Events received from a realtime session.

use bytes::Bytes;

/// A server-to-client event, already translated from the provider's wire
/// format.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// The server accepted the setup message.
    SetupComplete,
    /// A chunk of model audio as raw PCM16 little-endian bytes.
    AudioDelta {
        /// Decoded audio bytes.
        data: Bytes,
        /// MIME type announced by the server, if any.
        mime_type: Option<String>,
    },
    /// A fragment of model text (transcripts, text-modality replies).
    TextDelta {
        /// Text fragment.
        text: String,
    },
    /// The user started speaking over the model; pending playback must stop.
    Interrupted,
    /// The model finished its turn.
    TurnComplete,
    /// A message this client does not act on.
    Unknown,
}

impl ServerEvent {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetupComplete => "setup_complete",
            Self::AudioDelta { .. } => "audio_delta",
            Self::TextDelta { .. } => "text_delta",
            Self::Interrupted => "interrupted",
            Self::TurnComplete => "turn_complete",
            Self::Unknown => "unknown",
        }
    }
}
