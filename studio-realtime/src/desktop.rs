//! cpal-backed microphone and speaker.
//!
//! cpal streams are not `Send`, so each stream lives on its own thread and
//! the handles here only hold shared state and a stop signal.

use std::sync::Arc;
use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::audio::AudioFormat;
use crate::codec::AudioBuffer;
use crate::device::{AudioDevices, AudioSink, ChunkId, FrameAccumulator, FrameSender, Microphone};
use crate::error::{RealtimeError, Result};

/// A cpal stream running on a dedicated thread.
struct StreamThread {
    stop: Option<std_mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StreamThread {
    fn spawn<F>(name: &str, build: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Stream> + Send + 'static,
    {
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<()>>();
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();

        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let stream = match build() {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                if let Err(e) = stream.play() {
                    let _ = ready_tx.send(Err(RealtimeError::device(format!(
                        "Failed to start stream: {}",
                        e
                    ))));
                    return;
                }
                let _ = ready_tx.send(Ok(()));
                // Blocks until the handle sends or is dropped.
                let _ = stop_rx.recv();
                drop(stream);
            })
            .map_err(|e| RealtimeError::device(format!("Failed to spawn audio thread: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self { stop: Some(stop_tx), handle: Some(handle) }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => Err(RealtimeError::device("audio thread exited during startup")),
        }
    }

    fn stop(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StreamThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn stream_config(channels: u16, sample_rate: u32) -> StreamConfig {
    StreamConfig {
        channels,
        sample_rate: SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    }
}

/// Default input device captured at the protocol rate and downmixed to mono.
pub struct CpalMicrophone {
    format: AudioFormat,
    stream: Option<StreamThread>,
}

impl CpalMicrophone {
    pub fn new(format: AudioFormat) -> Self {
        Self { format, stream: None }
    }
}

#[async_trait]
impl Microphone for CpalMicrophone {
    async fn request_access(&mut self) -> Result<()> {
        // Desktop hosts have no explicit prompt; an unreachable input device
        // is how a refusal surfaces.
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| RealtimeError::permission("no accessible input device"))?;
        device
            .default_input_config()
            .map_err(|e| RealtimeError::permission(format!("input device unavailable: {}", e)))?;
        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );
        Ok(())
    }

    fn start(&mut self, frame_size: usize, frames: FrameSender) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        let sample_rate = self.format.sample_rate;

        let stream = StreamThread::spawn("studio-mic", move || {
            let host = cpal::default_host();
            let device = host
                .default_input_device()
                .ok_or_else(|| RealtimeError::device("No input device available"))?;
            let channels = device
                .default_input_config()
                .map_err(|e| RealtimeError::device(format!("Failed to get input config: {}", e)))?
                .channels();
            let config = stream_config(channels, sample_rate);
            let channels = channels as usize;
            let mut accumulator = FrameAccumulator::new(frame_size);

            device
                .build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let mono: Vec<f32> = if channels == 1 {
                            data.to_vec()
                        } else {
                            data.chunks(channels)
                                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                                .collect()
                        };
                        for frame in accumulator.push(&mono) {
                            if frames.send(frame).is_err() {
                                debug!("frame receiver dropped");
                                return;
                            }
                        }
                    },
                    |err| error!("Audio input stream error: {}", err),
                    None,
                )
                .map_err(|e| RealtimeError::device(format!("Failed to build input stream: {}", e)))
        })?;

        self.stream = Some(stream);
        info!(sample_rate, frame_size, "Started audio capture");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            info!("Stopped audio capture");
        }
    }
}

struct Voice {
    id: ChunkId,
    start_frame: u64,
    samples: Arc<[f32]>,
}

struct Mixer {
    sample_rate: u32,
    frames_rendered: u64,
    next_id: u64,
    voices: Vec<Voice>,
}

impl Mixer {
    fn render(&mut self, out: &mut [f32], channels: usize) {
        let frames = out.len() / channels;
        for (i, frame) in out.chunks_mut(channels).enumerate() {
            let t = self.frames_rendered + i as u64;
            let mut sample = 0.0f32;
            for voice in &self.voices {
                if t >= voice.start_frame {
                    if let Some(s) = voice.samples.get((t - voice.start_frame) as usize) {
                        sample += s;
                    }
                }
            }
            frame.fill(sample.clamp(-1.0, 1.0));
        }
        self.frames_rendered += frames as u64;
        let now = self.frames_rendered;
        self.voices.retain(|v| v.start_frame + v.samples.len() as u64 > now);
    }
}

/// Default output device with a sample-accurate scheduling clock.
///
/// Time starts at zero when the sink opens and advances with every frame
/// the device consumes.
pub struct CpalSink {
    mixer: Arc<Mutex<Mixer>>,
    stream: Option<StreamThread>,
}

impl CpalSink {
    pub fn open(format: AudioFormat) -> Result<Self> {
        let mixer = Arc::new(Mutex::new(Mixer {
            sample_rate: format.sample_rate,
            frames_rendered: 0,
            next_id: 0,
            voices: Vec::new(),
        }));
        let shared = Arc::clone(&mixer);
        let sample_rate = format.sample_rate;

        let stream = StreamThread::spawn("studio-speaker", move || {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or_else(|| RealtimeError::device("No output device available"))?;
            info!(
                "Using output device: {}",
                device.name().unwrap_or_else(|_| "Unknown".to_string())
            );
            let channels = device
                .default_output_config()
                .map_err(|e| RealtimeError::device(format!("Failed to get output config: {}", e)))?
                .channels();
            let config = stream_config(channels, sample_rate);
            let channels = channels as usize;

            device
                .build_output_stream(
                    &config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        shared.lock().render(data, channels);
                    },
                    |err| error!("Audio output stream error: {}", err),
                    None,
                )
                .map_err(|e| RealtimeError::device(format!("Failed to build output stream: {}", e)))
        })?;

        Ok(Self { mixer, stream: Some(stream) })
    }
}

impl AudioSink for CpalSink {
    fn current_time(&self) -> f64 {
        let mixer = self.mixer.lock();
        mixer.frames_rendered as f64 / mixer.sample_rate as f64
    }

    fn schedule(&mut self, buffer: &AudioBuffer, start_at: f64) -> Result<ChunkId> {
        if self.stream.is_none() {
            return Err(RealtimeError::device("output device is closed"));
        }
        let samples = buffer
            .channel(0)
            .cloned()
            .ok_or_else(|| RealtimeError::audio("buffer has no channels"))?;

        let mut mixer = self.mixer.lock();
        let id = ChunkId(mixer.next_id);
        mixer.next_id += 1;
        let start_frame = (start_at * mixer.sample_rate as f64).round().max(0.0) as u64;
        mixer.voices.push(Voice { id, start_frame, samples });
        Ok(id)
    }

    fn stop(&mut self, id: ChunkId) {
        self.mixer.lock().voices.retain(|v| v.id != id);
    }

    fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            self.mixer.lock().voices.clear();
            info!("Stopped audio playback");
        }
    }
}

/// [`AudioDevices`] backed by the host's default input and output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopAudio;

impl AudioDevices for DesktopAudio {
    fn open_microphone(&self, format: AudioFormat) -> Result<Box<dyn Microphone>> {
        Ok(Box::new(CpalMicrophone::new(format)))
    }

    fn open_sink(&self, format: AudioFormat) -> Result<Box<dyn AudioSink>> {
        Ok(Box::new(CpalSink::open(format)?))
    }
}
