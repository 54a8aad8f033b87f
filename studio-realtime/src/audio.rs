//! Audio format definitions for the Live protocol.

use serde::{Deserialize, Serialize};

/// Sample rate of captured microphone audio sent to the model.
pub const INPUT_SAMPLE_RATE: u32 = 16_000;

/// Sample rate of audio returned by the model.
pub const OUTPUT_SAMPLE_RATE: u32 = 24_000;

/// Number of samples per outbound microphone frame.
pub const FRAME_SIZE: usize = 4096;

/// Sample rate and channel count of a PCM16 stream.
///
/// The Live protocol only carries 16-bit little-endian PCM, so the
/// encoding is implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count; 1 for every Live stream.
    pub channels: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::pcm16_24khz()
    }
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self { sample_rate, channels }
    }

    /// Model output format.
    pub fn pcm16_24khz() -> Self {
        Self::new(OUTPUT_SAMPLE_RATE, 1)
    }

    /// Microphone input format.
    pub fn pcm16_16khz() -> Self {
        Self::new(INPUT_SAMPLE_RATE, 1)
    }

    /// MIME hint sent alongside encoded audio, e.g. `audio/pcm;rate=16000`.
    pub fn mime_type(&self) -> String {
        format!("audio/pcm;rate={}", self.sample_rate)
    }

    /// PCM16 byte rate.
    pub fn bytes_per_second(&self) -> u32 {
        self.sample_rate * self.channels as u32 * 2
    }

    /// Playback length of `bytes` of PCM16 in this format.
    pub fn duration_ms(&self, bytes: usize) -> f64 {
        let bytes_per_ms = self.bytes_per_second() as f64 / 1000.0;
        bytes as f64 / bytes_per_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type() {
        assert_eq!(AudioFormat::pcm16_16khz().mime_type(), "audio/pcm;rate=16000");
        assert_eq!(AudioFormat::pcm16_24khz().mime_type(), "audio/pcm;rate=24000");
    }

    #[test]
    fn test_duration() {
        let format = AudioFormat::pcm16_24khz();
        // 24000 samples * 2 bytes = 1 second
        assert!((format.duration_ms(48_000) - 1000.0).abs() < f64::EPSILON);
    }
}
