use studio_gemini::{GenerationResponse, Modality, Model};
use studio_realtime::{AudioBuffer, AudioFormat, OUTPUT_SAMPLE_RATE, decode_audio_frame};
use tracing::{instrument, warn};

use super::{Studio, require_text};
use crate::error::{Result, StudioError};

/// Text-to-speech model.
pub const SPEECH_MODEL: Model = Model::Gemini25FlashPreviewTts;

/// Prebuilt voice used for synthesized instructions.
pub const SPEECH_VOICE: &str = "Kore";

/// Raw synthesized speech: little-endian signed 16-bit mono PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAudio {
    pub pcm: Vec<u8>,
    pub sample_rate: u32,
}

impl SpeechAudio {
    fn from_response(response: &GenerationResponse) -> Result<Self> {
        let blob = response.inline_data().ok_or(StudioError::NoAudio)?;
        if !blob.mime_type.starts_with("audio/") {
            warn!(mime_type = %blob.mime_type, "speech part is not tagged as audio");
        }
        let pcm = blob.decode().map_err(|e| {
            StudioError::ContractViolation(format!("speech payload is not valid base64: {e}"))
        })?;
        if pcm.is_empty() {
            return Err(StudioError::NoAudio);
        }
        if pcm.len() % 2 != 0 {
            return Err(StudioError::ContractViolation(format!(
                "speech payload has {} bytes, not whole 16-bit samples",
                pcm.len()
            )));
        }
        Ok(Self { pcm, sample_rate: OUTPUT_SAMPLE_RATE })
    }

    /// Decode into float samples for playback.
    pub fn to_buffer(&self) -> Result<AudioBuffer> {
        Ok(decode_audio_frame(&self.pcm, self.sample_rate, 1)?)
    }

    /// Playback length in seconds.
    pub fn duration(&self) -> f64 {
        AudioFormat::new(self.sample_rate, 1).duration_ms(self.pcm.len()) / 1000.0
    }
}

impl Studio {
    /// Speak `text` with the fixed studio voice.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub async fn synthesize_speech(&self, text: &str) -> Result<SpeechAudio> {
        let text = require_text(text, "text to speak")?;
        let response = self
            .client()?
            .generate_content()
            .with_model(SPEECH_MODEL)
            .with_user_message(text)
            .with_response_modalities(vec![Modality::Audio])
            .with_voice(SPEECH_VOICE)
            .execute()
            .await?;
        SpeechAudio::from_response(&response)
    }
}
