//! Gemini Live transport.
//!
//! Audio goes up as 16 kHz mono PCM16 in `realtimeInput.mediaChunks` and
//! comes back as 24 kHz mono PCM16 in `serverContent.modelTurn.parts`. Voice
//! activity detection runs server side; barge-in arrives as
//! `serverContent.interrupted`.

mod model;
mod session;

pub use model::GeminiRealtimeModel;
pub use session::{GeminiRealtimeSession, translate_server_message};

/// Live API websocket endpoint; the API key goes in the `key` query parameter.
pub const GEMINI_LIVE_URL: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";
