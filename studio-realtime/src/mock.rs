//! In-memory devices and a scripted session for tests and offline demos.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::audio::AudioFormat;
use crate::codec::AudioBuffer;
use crate::config::LiveConfig;
use crate::device::{AudioDevices, AudioSink, ChunkId, FrameSender, Microphone};
use crate::error::{RealtimeError, Result};
use crate::events::ServerEvent;
use crate::model::RealtimeModel;
use crate::session::{BoxedSession, RealtimeSession};

#[derive(Debug, Default)]
struct SinkState {
    time: f64,
    next_id: u64,
    scheduled: Vec<(ChunkId, f64, f64)>,
    stopped: Vec<ChunkId>,
    closed: bool,
}

/// A sink with a manually advanced clock. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockSink {
    state: Arc<Mutex<SinkState>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&self, seconds: f64) {
        self.state.lock().time = seconds;
    }

    /// Every `(id, start, duration)` ever scheduled.
    pub fn scheduled(&self) -> Vec<(ChunkId, f64, f64)> {
        self.state.lock().scheduled.clone()
    }

    pub fn stopped(&self) -> Vec<ChunkId> {
        self.state.lock().stopped.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl AudioSink for MockSink {
    fn current_time(&self) -> f64 {
        self.state.lock().time
    }

    fn schedule(&mut self, buffer: &AudioBuffer, start_at: f64) -> Result<ChunkId> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(RealtimeError::device("sink is closed"));
        }
        let id = ChunkId(state.next_id);
        state.next_id += 1;
        state.scheduled.push((id, start_at, buffer.duration()));
        Ok(id)
    }

    fn stop(&mut self, id: ChunkId) {
        self.state.lock().stopped.push(id);
    }

    fn close(&mut self) {
        self.state.lock().closed = true;
    }
}

#[derive(Debug, Default)]
struct MicState {
    deny: bool,
    frames: Option<FrameSender>,
    frame_size: usize,
    access_requests: usize,
    starts: usize,
    stops: usize,
}

/// Shared view of every microphone opened by [`MockDevices`].
#[derive(Debug, Clone, Default)]
pub struct MockMicrophoneHandle {
    state: Arc<Mutex<MicState>>,
}

impl MockMicrophoneHandle {
    /// Refuse the next permission requests.
    pub fn deny_access(&self) {
        self.state.lock().deny = true;
    }

    /// Deliver a captured frame. Returns `false` when capture is not running.
    pub fn push_frame(&self, frame: Vec<f32>) -> bool {
        match &self.state.lock().frames {
            Some(sender) => sender.send(frame).is_ok(),
            None => false,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.state.lock().frames.is_some()
    }

    pub fn frame_size(&self) -> usize {
        self.state.lock().frame_size
    }

    pub fn access_requests(&self) -> usize {
        self.state.lock().access_requests
    }

    pub fn starts(&self) -> usize {
        self.state.lock().starts
    }

    pub fn stops(&self) -> usize {
        self.state.lock().stops
    }
}

/// A microphone driven by a [`MockMicrophoneHandle`].
#[derive(Debug)]
pub struct MockMicrophone {
    handle: MockMicrophoneHandle,
}

#[async_trait]
impl Microphone for MockMicrophone {
    async fn request_access(&mut self) -> Result<()> {
        let mut state = self.handle.state.lock();
        state.access_requests += 1;
        if state.deny {
            return Err(RealtimeError::permission("microphone access was denied"));
        }
        Ok(())
    }

    fn start(&mut self, frame_size: usize, frames: FrameSender) -> Result<()> {
        let mut state = self.handle.state.lock();
        state.frame_size = frame_size;
        state.frames = Some(frames);
        state.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.handle.state.lock();
        state.frames = None;
        state.stops += 1;
    }
}

/// Device factory backed by [`MockMicrophone`] and [`MockSink`].
#[derive(Debug, Clone, Default)]
pub struct MockDevices {
    pub microphone: MockMicrophoneHandle,
    pub sink: MockSink,
}

impl MockDevices {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioDevices for MockDevices {
    fn open_microphone(&self, _format: AudioFormat) -> Result<Box<dyn Microphone>> {
        Ok(Box::new(MockMicrophone { handle: self.microphone.clone() }))
    }

    fn open_sink(&self, _format: AudioFormat) -> Result<Box<dyn AudioSink>> {
        self.sink.state.lock().closed = false;
        Ok(Box::new(self.sink.clone()))
    }
}

#[derive(Debug, Default)]
struct SessionState {
    events: Option<mpsc::UnboundedSender<Result<ServerEvent>>>,
    sent_audio: Vec<(String, String)>,
    configs: Vec<LiveConfig>,
    connect_error: Option<String>,
    fail_sends: bool,
}

/// Shared control surface for sessions created by [`MockRealtimeModel`].
#[derive(Debug, Clone, Default)]
pub struct MockSessionHandle {
    state: Arc<Mutex<SessionState>>,
    closes: Arc<AtomicUsize>,
}

impl MockSessionHandle {
    /// Deliver an event to the current session.
    pub fn push_event(&self, event: ServerEvent) -> bool {
        self.push(Ok(event))
    }

    /// Deliver a receive error to the current session.
    pub fn push_error(&self, error: RealtimeError) -> bool {
        self.push(Err(error))
    }

    fn push(&self, item: Result<ServerEvent>) -> bool {
        match &self.state.lock().events {
            Some(sender) => sender.send(item).is_ok(),
            None => false,
        }
    }

    /// Simulate the server closing the connection.
    pub fn disconnect(&self) {
        self.state.lock().events = None;
    }

    /// Make the next `connect` fail with a connection error.
    pub fn fail_next_connect(&self, message: impl Into<String>) {
        self.state.lock().connect_error = Some(message.into());
    }

    /// Make every send fail.
    pub fn fail_sends(&self, fail: bool) {
        self.state.lock().fail_sends = fail;
    }

    /// `(base64 data, mime type)` of every audio message sent.
    pub fn sent_audio(&self) -> Vec<(String, String)> {
        self.state.lock().sent_audio.clone()
    }

    /// Configs passed to each successful `connect`.
    pub fn configs(&self) -> Vec<LiveConfig> {
        self.state.lock().configs.clone()
    }

    pub fn close_calls(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// A [`RealtimeModel`] whose sessions are scripted through a
/// [`MockSessionHandle`].
#[derive(Debug, Clone, Default)]
pub struct MockRealtimeModel {
    handle: MockSessionHandle,
}

impl MockRealtimeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> MockSessionHandle {
        self.handle.clone()
    }
}

#[async_trait]
impl RealtimeModel for MockRealtimeModel {
    fn provider(&self) -> &str {
        "mock"
    }

    async fn connect(&self, config: LiveConfig) -> Result<BoxedSession> {
        let mut state = self.handle.state.lock();
        if let Some(message) = state.connect_error.take() {
            return Err(RealtimeError::connection(message));
        }
        let (sender, receiver) = mpsc::unbounded_channel();
        state.events = Some(sender);
        state.configs.push(config);
        drop(state);

        Ok(Box::new(MockSession {
            session_id: uuid::Uuid::new_v4().to_string(),
            handle: self.handle.clone(),
            events: tokio::sync::Mutex::new(receiver),
        }))
    }
}

struct MockSession {
    session_id: String,
    handle: MockSessionHandle,
    events: tokio::sync::Mutex<mpsc::UnboundedReceiver<Result<ServerEvent>>>,
}

#[async_trait]
impl RealtimeSession for MockSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn is_connected(&self) -> bool {
        self.handle.state.lock().events.is_some()
    }

    async fn send_audio_base64(&self, audio_base64: &str, mime_type: &str) -> Result<()> {
        let mut state = self.handle.state.lock();
        if state.fail_sends {
            return Err(RealtimeError::connection("send failed"));
        }
        state.sent_audio.push((audio_base64.to_string(), mime_type.to_string()));
        Ok(())
    }

    async fn next_event(&self) -> Option<Result<ServerEvent>> {
        self.events.lock().await.recv().await
    }

    async fn close(&self) -> Result<()> {
        self.handle.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
