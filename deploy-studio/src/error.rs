//! Application error taxonomy.

use studio_gemini::ClientError;
use studio_realtime::RealtimeError;
use thiserror::Error;

/// Result type for orchestrator calls.
pub type Result<T> = std::result::Result<T, StudioError>;

/// Every failure a Deploy Studio operation can report.
#[derive(Error, Debug)]
pub enum StudioError {
    /// Missing or unusable configuration, usually the API key.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never produced a usable HTTP response.
    #[error("request to Gemini failed: {0}")]
    Transport(#[source] ClientError),

    /// The model answered, but not in the agreed shape.
    #[error("unexpected model response: {0}")]
    ContractViolation(String),

    /// Speech synthesis returned no audio part.
    #[error("the speech response contained no audio")]
    NoAudio,

    /// The caller supplied input that cannot be sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Voice session failure.
    #[error(transparent)]
    Realtime(#[from] RealtimeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ClientError> for StudioError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::MissingApiKey => Self::Config("API key is missing".to_string()),
            ClientError::InvalidApiKey { .. } => {
                Self::Config("API key contains characters that cannot be sent".to_string())
            }
            ClientError::Configuration { message } => Self::Config(message),
            other if other.is_transport() => Self::Transport(other),
            other => Self::Config(other.to_string()),
        }
    }
}

impl StudioError {
    /// A single sentence suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(detail) => format!(
                "Gemini is not configured ({detail}). Set GEMINI_API_KEY or add it to a .env file."
            ),
            Self::Transport(ClientError::BadResponse { code, .. }) => {
                format!("Gemini rejected the request (HTTP {code}). Please try again.")
            }
            Self::Transport(_) => {
                "Could not reach Gemini. Check your connection and try again.".to_string()
            }
            Self::ContractViolation(_) => {
                "The model returned an unusable result. Try again or rephrase the prompt."
                    .to_string()
            }
            Self::NoAudio => "No audio was generated for this text.".to_string(),
            Self::InvalidInput(detail) => detail.clone(),
            Self::Realtime(RealtimeError::PermissionDenied(_)) => {
                "Microphone access was denied. Allow access and start the session again."
                    .to_string()
            }
            Self::Realtime(RealtimeError::ConfigError(detail)) => {
                format!("Voice session is not configured ({detail}).")
            }
            Self::Realtime(RealtimeError::AlreadyActive) => {
                "A voice session is already running.".to_string()
            }
            Self::Realtime(e) => format!("Voice session failed: {e}"),
            Self::Io(e) => format!("Could not write output: {e}"),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Realtime(RealtimeError::ConfigError(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_split_into_config_and_transport() {
        assert!(StudioError::from(ClientError::MissingApiKey).is_config());
        let err = StudioError::from(ClientError::BadResponse { code: 503, description: None });
        assert!(matches!(err, StudioError::Transport(_)));
        assert!(err.user_message().contains("503"));
    }

    #[test]
    fn test_unbuildable_request_is_config() {
        let err = StudioError::from(ClientError::ConstructUrl {
            source: url::ParseError::EmptyHost,
            suffix: "models/x:generateContent".to_string(),
        });
        assert!(err.is_config());
    }

    #[test]
    fn test_user_messages_are_single_sentences() {
        let errors = [
            StudioError::Config("API key is missing".into()),
            StudioError::ContractViolation("files is empty".into()),
            StudioError::NoAudio,
            StudioError::Realtime(RealtimeError::permission("denied")),
        ];
        for error in errors {
            let message = error.user_message();
            assert!(!message.is_empty());
            assert!(!message.contains('\n'));
        }
    }
}
