//! Gapless playback scheduling.

use tracing::debug;

use crate::codec::AudioBuffer;
use crate::device::{AudioSink, ChunkId};
use crate::error::Result;

/// A chunk handed to the sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledChunk {
    pub id: ChunkId,
    /// Device time the chunk starts at, in seconds.
    pub start: f64,
    /// Length in seconds.
    pub duration: f64,
}

impl ScheduledChunk {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Queues decoded buffers back-to-back on an [`AudioSink`].
///
/// Each chunk starts at `max(cursor, now)` so playback never starts in the
/// past and never overlaps the previous chunk. An interruption stops every
/// chunk and resets the cursor.
#[derive(Debug)]
pub struct PlaybackScheduler<S: AudioSink> {
    sink: S,
    cursor: f64,
    scheduled: Vec<ScheduledChunk>,
}

impl<S: AudioSink> PlaybackScheduler<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, cursor: 0.0, scheduled: Vec::new() }
    }

    pub fn enqueue(&mut self, buffer: &AudioBuffer) -> Result<ScheduledChunk> {
        let now = self.sink.current_time();
        self.scheduled.retain(|chunk| chunk.end() > now);

        let start = self.cursor.max(now);
        let id = self.sink.schedule(buffer, start)?;
        let chunk = ScheduledChunk { id, start, duration: buffer.duration() };
        self.cursor = chunk.end();
        self.scheduled.push(chunk);
        Ok(chunk)
    }

    /// Stop and forget every scheduled chunk.
    pub fn interrupt(&mut self) {
        let stopped = self.scheduled.len();
        for chunk in self.scheduled.drain(..) {
            self.sink.stop(chunk.id);
        }
        self.cursor = 0.0;
        debug!(stopped, "playback interrupted");
    }

    /// Interrupt and release the sink.
    pub fn close(&mut self) {
        self.interrupt();
        self.sink.close();
    }

    /// Device time the next chunk would start at, before clamping to now.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Chunks that have not been observed to finish.
    pub fn scheduled_len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
