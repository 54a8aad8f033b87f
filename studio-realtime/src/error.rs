use thiserror::Error;

pub type Result<T> = std::result::Result<T, RealtimeError>;

/// Voice session failures. Each variant's message is shown to the user as is.
#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error("connection to the live model failed: {0}")]
    ConnectionError(String),

    /// The server sent something this client cannot interpret.
    #[error("unexpected live message: {0}")]
    MessageError(String),

    #[error("not connected to the live model")]
    NotConnected,

    #[error("a voice session is already active")]
    AlreadyActive,

    /// Usually a missing API key.
    #[error("voice session is not configured: {0}")]
    ConfigError(String),

    #[error("microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("audio device error: {0}")]
    DeviceError(String),

    /// PCM that does not fit the declared format.
    #[error("invalid audio: {0}")]
    AudioFormatError(String),

    #[error("cannot encode live message: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl RealtimeError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::MessageError(msg.into())
    }

    pub fn audio(msg: impl Into<String>) -> Self {
        Self::AudioFormatError(msg.into())
    }

    pub fn device(msg: impl Into<String>) -> Self {
        Self::DeviceError(msg.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }
}
