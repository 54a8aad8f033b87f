//! Voice session lifecycle.
//!
//! [`VoiceSessionManager`] owns one live session at a time: the transport,
//! the microphone and the playback scheduler. Every failure lands in
//! [`SessionState::Closed`] with a message and releases what was acquired.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::audio::FRAME_SIZE;
use crate::codec::{decode_audio_frame, encode_pcm16_as};
use crate::config::LiveConfig;
use crate::device::{AudioDevices, AudioSink, FrameReceiver, Microphone};
use crate::error::{RealtimeError, Result};
use crate::events::ServerEvent;
use crate::model::BoxedModel;
use crate::playback::PlaybackScheduler;
use crate::session::BoxedSession;

/// Lifecycle state of a voice session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Connecting,
    Streaming,
    /// Terminal state; `error` is set when the session ended by failure.
    Closed { error: Option<String> },
}

/// What a front end shows for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Connecting,
    Listening,
    Error(String),
    Closed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Connecting => f.write_str("Connecting to Gemini Live..."),
            Self::Listening => f.write_str("Listening..."),
            Self::Error(message) => write!(f, "Error: {message}"),
            Self::Closed => f.write_str("Session closed"),
        }
    }
}

enum Step {
    Frame(Option<Vec<f32>>),
    Event(Option<Result<ServerEvent>>),
    Shutdown,
}

/// Drives a single realtime voice session.
pub struct VoiceSessionManager {
    model: BoxedModel,
    devices: Arc<dyn AudioDevices>,
    config: LiveConfig,
    state: SessionState,
    session: Option<BoxedSession>,
    microphone: Option<Box<dyn Microphone>>,
    frames: Option<FrameReceiver>,
    playback: Option<PlaybackScheduler<Box<dyn AudioSink>>>,
}

impl VoiceSessionManager {
    pub fn new(model: BoxedModel, devices: Arc<dyn AudioDevices>, config: LiveConfig) -> Self {
        Self {
            model,
            devices,
            config,
            state: SessionState::Idle,
            session: None,
            microphone: None,
            frames: None,
            playback: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        match &self.state {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Connecting => SessionStatus::Connecting,
            SessionState::Streaming => SessionStatus::Listening,
            SessionState::Closed { error: Some(message) } => SessionStatus::Error(message.clone()),
            SessionState::Closed { error: None } => SessionStatus::Closed,
        }
    }

    /// Playback cursor in device seconds, `0.0` when no session is open.
    pub fn playback_cursor(&self) -> f64 {
        self.playback.as_ref().map_or(0.0, PlaybackScheduler::cursor)
    }

    /// Number of output chunks currently scheduled.
    pub fn scheduled_chunks(&self) -> usize {
        self.playback.as_ref().map_or(0, PlaybackScheduler::scheduled_len)
    }

    /// Whether any device or connection handle is held.
    pub fn holds_resources(&self) -> bool {
        self.session.is_some()
            || self.microphone.is_some()
            || self.frames.is_some()
            || self.playback.is_some()
    }

    /// Acquire devices, connect and start streaming.
    ///
    /// Rejected with [`RealtimeError::AlreadyActive`] while connecting or
    /// streaming. On failure the state becomes `Closed` with the error
    /// message and the error is returned.
    pub async fn open(&mut self) -> Result<()> {
        if matches!(self.state, SessionState::Connecting | SessionState::Streaming) {
            return Err(RealtimeError::AlreadyActive);
        }
        self.state = SessionState::Connecting;
        info!(model = %self.config.model, "opening voice session");

        match self.connect().await {
            Ok(()) => {
                info!("voice session streaming");
                Ok(())
            }
            Err(e) => {
                self.fail(&e).await;
                Err(e)
            }
        }
    }

    async fn connect(&mut self) -> Result<()> {
        let input = self.model.input_format();
        let output = self.model.output_format();

        let mut microphone = self.devices.open_microphone(input)?;
        let sink = self.devices.open_sink(output)?;
        self.playback = Some(PlaybackScheduler::new(sink));

        microphone.request_access().await?;
        self.microphone = Some(microphone);

        let session = self.model.connect(self.config.clone()).await?;
        debug!(session_id = session.session_id(), "live connection established");
        self.session = Some(session);

        self.on_connected()
    }

    fn on_connected(&mut self) -> Result<()> {
        self.state = SessionState::Streaming;
        let (sender, receiver) = mpsc::unbounded_channel();
        if let Some(microphone) = self.microphone.as_mut() {
            microphone.start(FRAME_SIZE, sender)?;
        }
        self.frames = Some(receiver);
        Ok(())
    }

    /// Encode and send one captured frame.
    ///
    /// Frames outside `Streaming` are dropped. A failed send drops the frame
    /// without closing the session.
    pub async fn handle_frame(&mut self, frame: &[f32]) {
        let (SessionState::Streaming, Some(session)) = (&self.state, self.session.as_ref()) else {
            trace!(samples = frame.len(), "dropping frame outside streaming state");
            return;
        };

        let encoded = encode_pcm16_as(frame, self.model.input_format());
        if let Err(e) = session.send_audio_base64(&encoded.data, &encoded.mime_type).await {
            warn!(error = %e, "failed to send audio frame");
        }
    }

    /// Apply one server event to playback.
    pub fn handle_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::AudioDelta { data, .. } => {
                let Some(playback) = self.playback.as_mut() else {
                    trace!("dropping audio with no open sink");
                    return;
                };
                let format = self.model.output_format();
                let buffer = match decode_audio_frame(&data, format.sample_rate, format.channels) {
                    Ok(buffer) => buffer,
                    Err(e) => {
                        warn!(error = %e, "skipping malformed audio chunk");
                        return;
                    }
                };
                match playback.enqueue(&buffer) {
                    Ok(chunk) => {
                        trace!(start = chunk.start, duration = chunk.duration, "scheduled audio")
                    }
                    Err(e) => warn!(error = %e, "failed to schedule audio chunk"),
                }
            }
            ServerEvent::Interrupted => {
                debug!("model interrupted by user speech");
                if let Some(playback) = self.playback.as_mut() {
                    playback.interrupt();
                }
            }
            ServerEvent::TextDelta { text } => debug!(%text, "model text"),
            other => debug!(kind = other.kind(), "server event"),
        }
    }

    /// Pump microphone frames and server events until the session ends or
    /// `shutdown` resolves.
    ///
    /// A remote close ends in `Closed` without error; a receive failure ends
    /// in `Closed` with the error; shutdown calls [`close`](Self::close).
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        while self.state == SessionState::Streaming {
            let step = {
                let (Some(frames), Some(session)) = (self.frames.as_mut(), self.session.as_ref())
                else {
                    break;
                };
                tokio::select! {
                    _ = &mut shutdown => Step::Shutdown,
                    frame = frames.recv() => Step::Frame(frame),
                    event = session.next_event() => Step::Event(event),
                }
            };

            match step {
                Step::Frame(Some(frame)) => self.handle_frame(&frame).await,
                Step::Frame(None) => {
                    let e = RealtimeError::device("microphone stopped delivering audio");
                    self.fail(&e).await;
                    return Err(e);
                }
                Step::Event(Some(Ok(event))) => self.handle_event(event),
                Step::Event(Some(Err(e))) => {
                    self.fail(&e).await;
                    return Err(e);
                }
                Step::Event(None) => {
                    info!("voice session closed by server");
                    self.release().await;
                    self.state = SessionState::Closed { error: None };
                }
                Step::Shutdown => {
                    self.close().await;
                }
            }
        }
        Ok(())
    }

    /// Tear down the session. Safe to call any number of times.
    pub async fn close(&mut self) {
        let had_session = self.holds_resources();
        self.release().await;
        self.state = SessionState::Idle;
        if had_session {
            info!("voice session closed");
        }
    }

    async fn fail(&mut self, error: &RealtimeError) {
        warn!(error = %error, "voice session failed");
        self.release().await;
        self.state = SessionState::Closed { error: Some(error.to_string()) };
    }

    async fn release(&mut self) {
        if let Some(mut microphone) = self.microphone.take() {
            microphone.stop();
        }
        self.frames = None;
        if let Some(mut playback) = self.playback.take() {
            playback.close();
        }
        if let Some(session) = self.session.take() {
            if let Err(e) = session.close().await {
                debug!(error = %e, "ignoring error while closing live connection");
            }
        }
    }
}

impl std::fmt::Debug for VoiceSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSessionManager")
            .field("provider", &self.model.provider())
            .field("state", &self.state)
            .field("config", &self.config)
            .finish()
    }
}
