//! Live voice session front end.

use std::future::Future;
use std::io::Write;

use studio_realtime::{SessionStatus, VoiceSessionManager};

use crate::error::Result;

/// Open the session, stream until it ends or `shutdown` resolves, and print
/// each status the user would see.
pub async fn drive_session<F, W>(
    manager: &mut VoiceSessionManager,
    shutdown: F,
    out: &mut W,
) -> Result<SessionStatus>
where
    F: Future<Output = ()>,
    W: Write,
{
    writeln!(out, "{}", SessionStatus::Connecting)?;
    if let Err(e) = manager.open().await {
        writeln!(out, "{}", manager.status())?;
        return Err(e.into());
    }
    writeln!(out, "{}", manager.status())?;

    let outcome = manager.run(shutdown).await;
    let status = manager.status();
    writeln!(out, "{status}")?;
    outcome?;
    Ok(status)
}

#[cfg(feature = "desktop-audio")]
mod desktop {
    use std::sync::Arc;
    use std::time::Duration;

    use studio_realtime::desktop::{CpalSink, DesktopAudio};
    use studio_realtime::gemini::GeminiRealtimeModel;
    use studio_realtime::{AudioFormat, AudioSink, LiveConfig, PlaybackScheduler};
    use tracing::info;

    use super::*;
    use crate::config::StudioConfig;
    use crate::orchestrator::SpeechAudio;

    /// Talk to Gemini Live through the default microphone and speakers
    /// until Ctrl-C.
    pub async fn run_voice_session(config: &StudioConfig) -> Result<()> {
        config.require_api_key()?;
        let model = Arc::new(GeminiRealtimeModel::new(config.live_backend()));
        let mut manager =
            VoiceSessionManager::new(model, Arc::new(DesktopAudio), LiveConfig::default());

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Ctrl-C received, closing voice session");
        };
        drive_session(&mut manager, shutdown, &mut std::io::stdout()).await?;
        Ok(())
    }

    /// Play synthesized speech on the default output device and wait for it
    /// to finish.
    pub async fn play_speech(audio: &SpeechAudio) -> Result<()> {
        let buffer = audio.to_buffer()?;
        let sink = CpalSink::open(AudioFormat::pcm16_24khz())?;
        let mut playback = PlaybackScheduler::new(sink);
        let chunk = playback.enqueue(&buffer)?;

        let remaining = chunk.end() - playback.sink().current_time();
        tokio::time::sleep(Duration::from_secs_f64(remaining.max(0.0))).await;
        playback.close();
        Ok(())
    }
}

#[cfg(feature = "desktop-audio")]
pub use desktop::{play_speech, run_voice_session};
