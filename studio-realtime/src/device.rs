//! Audio device abstractions.
//!
//! A voice session needs a microphone that delivers fixed-size frames and an
//! output sink that can play buffers at precise times on its own clock.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::audio::AudioFormat;
use crate::codec::AudioBuffer;
use crate::error::Result;

/// Identifier of a chunk scheduled on an [`AudioSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u64);

/// Sender half used by a microphone to deliver captured frames.
pub type FrameSender = mpsc::UnboundedSender<Vec<f32>>;

/// Receiver half of [`FrameSender`].
pub type FrameReceiver = mpsc::UnboundedReceiver<Vec<f32>>;

/// An output device with a monotonic playback clock.
pub trait AudioSink: Send {
    /// Current device time in seconds.
    fn current_time(&self) -> f64;

    /// Play `buffer` starting at device time `start_at`.
    fn schedule(&mut self, buffer: &AudioBuffer, start_at: f64) -> Result<ChunkId>;

    /// Stop a scheduled chunk, whether or not it has started.
    fn stop(&mut self, id: ChunkId);

    /// Release the device. Further calls are no-ops.
    fn close(&mut self);
}

impl AudioSink for Box<dyn AudioSink> {
    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn schedule(&mut self, buffer: &AudioBuffer, start_at: f64) -> Result<ChunkId> {
        (**self).schedule(buffer, start_at)
    }

    fn stop(&mut self, id: ChunkId) {
        (**self).stop(id)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// A capture device delivering mono `f32` frames.
#[async_trait]
pub trait Microphone: Send {
    /// Ask for capture permission. Fails with
    /// [`RealtimeError::PermissionDenied`](crate::RealtimeError::PermissionDenied)
    /// when refused.
    async fn request_access(&mut self) -> Result<()>;

    /// Begin capturing, sending every `frame_size` samples to `frames`.
    fn start(&mut self, frame_size: usize, frames: FrameSender) -> Result<()>;

    /// Stop capturing. Idempotent.
    fn stop(&mut self);
}

/// Opens fresh device handles for each session.
pub trait AudioDevices: Send + Sync {
    fn open_microphone(&self, format: AudioFormat) -> Result<Box<dyn Microphone>>;

    fn open_sink(&self, format: AudioFormat) -> Result<Box<dyn AudioSink>>;
}

/// Splits an arbitrary stream of samples into fixed-size frames.
#[derive(Debug)]
pub struct FrameAccumulator {
    frame_size: usize,
    pending: Vec<f32>,
}

impl FrameAccumulator {
    pub fn new(frame_size: usize) -> Self {
        Self { frame_size: frame_size.max(1), pending: Vec::with_capacity(frame_size) }
    }

    /// Append samples and return every frame that is now complete.
    pub fn push(&mut self, samples: &[f32]) -> Vec<Vec<f32>> {
        self.pending.extend_from_slice(samples);
        let mut frames = Vec::new();
        while self.pending.len() >= self.frame_size {
            let rest = self.pending.split_off(self.frame_size);
            frames.push(std::mem::replace(&mut self.pending, rest));
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_accumulator() {
        let mut acc = FrameAccumulator::new(4);
        assert!(acc.push(&[0.1, 0.2, 0.3]).is_empty());

        let frames = acc.push(&[0.4, 0.5, 0.6, 0.7, 0.8, 0.9]);
        assert_eq!(frames, vec![vec![0.1, 0.2, 0.3, 0.4], vec![0.5, 0.6, 0.7, 0.8]]);

        let frames = acc.push(&[1.0, 1.1, 1.2]);
        assert_eq!(frames, vec![vec![0.9, 1.0, 1.1, 1.2]]);
    }
}
