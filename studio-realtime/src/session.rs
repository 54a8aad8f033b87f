//! One live connection to a realtime model.

use async_trait::async_trait;

use crate::error::Result;
use crate::events::ServerEvent;

/// An open bidirectional audio session.
///
/// Sends and receives may run concurrently from the same task via
/// `tokio::select!`, so every method takes `&self`.
///
/// ```rust,ignore
/// session.send_audio_base64(&encoded.data, &encoded.mime_type).await?;
/// while let Some(event) = session.next_event().await {
///     match event? {
///         ServerEvent::AudioDelta { data, .. } => { /* schedule playback */ }
///         ServerEvent::Interrupted => { /* stop playback */ }
///         _ => {}
///     }
/// }
/// ```
#[async_trait]
pub trait RealtimeSession: Send + Sync {
    fn session_id(&self) -> &str;

    fn is_connected(&self) -> bool;

    /// Stream one base64 PCM frame tagged with its MIME hint.
    async fn send_audio_base64(&self, audio_base64: &str, mime_type: &str) -> Result<()>;

    /// `None` once the server has closed the connection.
    async fn next_event(&self) -> Option<Result<ServerEvent>>;

    /// Close the connection. Calling it again is a no-op.
    async fn close(&self) -> Result<()>;
}

pub type BoxedSession = Box<dyn RealtimeSession>;
