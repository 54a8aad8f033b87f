//! PCM16 codec helpers.
//!
//! Outbound microphone frames are `f32` samples in `[-1.0, 1.0]` that are
//! scaled to 16-bit integers, packed little-endian and base64-encoded.
//! Inbound model audio takes the reverse path into an [`AudioBuffer`].

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::audio::AudioFormat;
use crate::error::{RealtimeError, Result};

/// A base64 PCM payload ready to send, with its MIME hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    pub data: String,
    pub mime_type: String,
}

/// Encode microphone samples captured at 16 kHz.
///
/// Each sample is multiplied by 32768 and truncated toward zero; values
/// outside the `i16` range saturate. No resampling is performed.
pub fn encode_pcm16(samples: &[f32]) -> EncodedAudio {
    encode_pcm16_as(samples, AudioFormat::pcm16_16khz())
}

/// Encode samples and tag them with the given format's MIME hint.
pub fn encode_pcm16_as(samples: &[f32], format: AudioFormat) -> EncodedAudio {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        bytes.extend_from_slice(&((sample * 32768.0) as i16).to_le_bytes());
    }
    EncodedAudio { data: STANDARD.encode(&bytes), mime_type: format.mime_type() }
}

/// Decode a standard-alphabet base64 payload into raw bytes.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    STANDARD.decode(payload).map_err(|e| RealtimeError::audio(format!("invalid base64: {e}")))
}

/// Reinterpret little-endian PCM16 bytes as a playable buffer.
///
/// Interleaved samples are split per channel and divided by 32768.
pub fn decode_audio_frame(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<AudioBuffer> {
    if channels == 0 {
        return Err(RealtimeError::audio("channel count must be at least 1"));
    }
    if sample_rate == 0 {
        return Err(RealtimeError::audio("sample rate must be positive"));
    }
    let stride = 2 * channels as usize;
    if bytes.len() % stride != 0 {
        return Err(RealtimeError::audio(format!(
            "{} bytes is not a whole number of {channels}-channel PCM16 frames",
            bytes.len()
        )));
    }

    let frames = bytes.len() / stride;
    let mut data: Vec<Vec<f32>> = vec![Vec::with_capacity(frames); channels as usize];
    for frame in bytes.chunks_exact(stride) {
        for (channel, sample) in frame.chunks_exact(2).enumerate() {
            let value = i16::from_le_bytes([sample[0], sample[1]]);
            data[channel].push(value as f32 / 32768.0);
        }
    }

    Ok(AudioBuffer { sample_rate, channels: data.into_iter().map(Arc::from).collect() })
}

/// Decoded, de-interleaved PCM ready for scheduling.
///
/// Cloning is cheap; channel data is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Arc<[f32]>>,
}

impl AudioBuffer {
    /// Build a mono buffer from samples.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { sample_rate, channels: vec![Arc::from(samples)] }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples for one channel.
    pub fn channel(&self, index: usize) -> Option<&Arc<[f32]>> {
        self.channels.get(index)
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// Playback length in seconds.
    pub fn duration(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }
}
