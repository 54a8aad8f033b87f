//! # studio-realtime
//!
//! Realtime voice sessions against the Gemini Live API.
//!
//! ## Overview
//!
//! - [`codec`] converts between `f32` samples and base64 PCM16
//! - [`playback`] schedules decoded audio gaplessly on an [`AudioSink`]
//! - [`device`] abstracts the microphone and speaker
//! - [`gemini`] is the websocket transport
//! - [`manager`] ties them together in [`VoiceSessionManager`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use studio_realtime::{LiveConfig, VoiceSessionManager};
//! use studio_realtime::gemini::GeminiRealtimeModel;
//! use studio_realtime::desktop::DesktopAudio;
//!
//! let model = Arc::new(GeminiRealtimeModel::new(backend));
//! let mut manager = VoiceSessionManager::new(model, Arc::new(DesktopAudio), LiveConfig::default());
//! manager.open().await?;
//! manager.run(async { tokio::signal::ctrl_c().await.ok(); }).await?;
//! ```

pub mod audio;
pub mod codec;
pub mod config;
pub mod device;
pub mod error;
pub mod events;
pub mod gemini;
pub mod manager;
pub mod mock;
pub mod model;
pub mod playback;
pub mod session;

#[cfg(feature = "desktop-audio")]
pub mod desktop;

pub use audio::{AudioFormat, FRAME_SIZE, INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE};
pub use codec::{AudioBuffer, EncodedAudio, decode_audio_frame, decode_base64, encode_pcm16};
pub use config::LiveConfig;
pub use device::{AudioDevices, AudioSink, ChunkId, Microphone};
pub use error::{RealtimeError, Result};
pub use events::ServerEvent;
pub use manager::{SessionState, SessionStatus, VoiceSessionManager};
pub use model::{BoxedModel, RealtimeModel};
pub use playback::{PlaybackScheduler, ScheduledChunk};
pub use session::{BoxedSession, RealtimeSession};
