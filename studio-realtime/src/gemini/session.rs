//! Websocket transport for the Gemini Live `BidiGenerateContent` endpoint.

use std::collections::VecDeque;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use studio_gemini::{Blob, Content, GeminiLiveBackend, Modality, SpeechConfig};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use url::Url;

use super::GEMINI_LIVE_URL;
use crate::codec::decode_base64;
use crate::config::LiveConfig;
use crate::error::{RealtimeError, Result};
use crate::events::ServerEvent;
use crate::session::RealtimeSession;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

static CRYPTO_PROVIDER: Once = Once::new();

fn install_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        // fails only when a provider is already installed
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    });
}

/// Frames this client sends. Serializes as `{"setup": ...}` or
/// `{"realtimeInput": ...}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum ClientMessage {
    Setup(Setup),
    RealtimeInput(RealtimeInput),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Setup {
    model: String,
    generation_config: SetupGenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SetupGenerationConfig {
    response_modalities: Vec<Modality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RealtimeInput {
    media_chunks: Vec<Blob>,
}

fn build_setup(config: LiveConfig) -> Setup {
    Setup {
        model: config.model,
        generation_config: SetupGenerationConfig {
            response_modalities: config.modalities,
            speech_config: config.voice.map(SpeechConfig::prebuilt),
        },
        system_instruction: config.instruction.map(Content::text),
    }
}

/// One open Live connection.
///
/// Sending and receiving use separate halves of the socket so a pending
/// receive never blocks outgoing audio.
pub struct GeminiRealtimeSession {
    session_id: String,
    open: AtomicBool,
    outbound: Mutex<SplitSink<Socket, Message>>,
    inbound: Mutex<SplitStream<Socket>>,
    /// Events already translated but not yet handed out.
    pending: parking_lot::Mutex<VecDeque<ServerEvent>>,
}

/// Live endpoint with the key as a percent-encoded `key` query parameter.
fn live_endpoint(api_key: &str) -> Result<Url> {
    let mut url = Url::parse(GEMINI_LIVE_URL)
        .map_err(|e| RealtimeError::connection(format!("invalid Live endpoint: {e}")))?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

impl GeminiRealtimeSession {
    /// Open the websocket and send the setup frame.
    pub async fn connect(backend: GeminiLiveBackend, config: LiveConfig) -> Result<Self> {
        install_crypto_provider();

        let GeminiLiveBackend::Studio { api_key } = backend;
        let request = live_endpoint(&api_key)?
            .as_str()
            .into_client_request()
            .map_err(|e| RealtimeError::connection(format!("invalid Live endpoint: {e}")))?;
        let (socket, _) = connect_async(request)
            .await
            .map_err(|e| RealtimeError::connection(format!("cannot reach Gemini Live: {e}")))?;
        let (outbound, inbound) = socket.split();

        let session = Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            open: AtomicBool::new(true),
            outbound: Mutex::new(outbound),
            inbound: Mutex::new(inbound),
            pending: parking_lot::Mutex::new(VecDeque::new()),
        };

        info!(model = %config.model, session_id = %session.session_id, "sending Live setup");
        session.send(&ClientMessage::Setup(build_setup(config))).await?;
        Ok(session)
    }

    async fn send(&self, message: &ClientMessage) -> Result<()> {
        let text = serde_json::to_string(message)?;
        self.outbound
            .lock()
            .await
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| RealtimeError::connection(format!("send failed: {e}")))
    }

    fn mark_closed(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    /// Next text payload from the socket, skipping control frames.
    async fn next_payload(&self) -> Option<Result<String>> {
        let mut inbound = self.inbound.lock().await;
        loop {
            match inbound.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text.as_str().to_owned())),
                Some(Ok(Message::Binary(bytes))) => {
                    return Some(String::from_utf8(bytes.to_vec()).map_err(|e| {
                        RealtimeError::protocol(format!("binary frame is not UTF-8: {e}"))
                    }));
                }
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "Live session closed by server");
                    self.mark_closed();
                    return None;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.mark_closed();
                    return Some(Err(RealtimeError::connection(format!("receive failed: {e}"))));
                }
                None => {
                    self.mark_closed();
                    return None;
                }
            }
        }
    }
}

/// Translate one Live API server message into events, in message order.
///
/// Audio and text parts come first, then an interruption, then turn
/// completion. Audio parts with undecodable payloads are skipped.
pub fn translate_server_message(raw: &str) -> Result<Vec<ServerEvent>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| RealtimeError::protocol(format!("server message is not JSON: {e}")))?;

    let mut events = Vec::new();

    if value.get("setupComplete").is_some() {
        events.push(ServerEvent::SetupComplete);
    }

    if let Some(content) = value.get("serverContent") {
        let parts = content
            .get("modelTurn")
            .and_then(|t| t.get("parts"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for part in parts {
            if let Some(inline_data) = part.get("inlineData") {
                let Some(data) = inline_data.get("data").and_then(Value::as_str) else {
                    continue;
                };
                match decode_base64(data) {
                    Ok(decoded) => events.push(ServerEvent::AudioDelta {
                        data: Bytes::from(decoded),
                        mime_type: inline_data
                            .get("mimeType")
                            .and_then(Value::as_str)
                            .map(str::to_owned),
                    }),
                    Err(e) => warn!(error = %e, "skipping undecodable audio part"),
                }
            } else if let Some(text) = part.get("text").and_then(Value::as_str) {
                events.push(ServerEvent::TextDelta { text: text.to_string() });
            }
        }

        if content.get("interrupted").and_then(Value::as_bool).unwrap_or(false) {
            events.push(ServerEvent::Interrupted);
        }
        if content.get("turnComplete").and_then(Value::as_bool).unwrap_or(false) {
            events.push(ServerEvent::TurnComplete);
        }
    }

    if events.is_empty() {
        debug!(%raw, "unhandled Live message");
        events.push(ServerEvent::Unknown);
    }
    Ok(events)
}

#[async_trait]
impl RealtimeSession for GeminiRealtimeSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn is_connected(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn send_audio_base64(&self, audio_base64: &str, mime_type: &str) -> Result<()> {
        if !self.is_connected() {
            return Err(RealtimeError::NotConnected);
        }
        let input = RealtimeInput { media_chunks: vec![Blob::new(mime_type, audio_base64)] };
        self.send(&ClientMessage::RealtimeInput(input)).await
    }

    async fn next_event(&self) -> Option<Result<ServerEvent>> {
        if let Some(event) = self.pending.lock().pop_front() {
            return Some(Ok(event));
        }
        let payload = match self.next_payload().await? {
            Ok(payload) => payload,
            Err(e) => return Some(Err(e)),
        };
        let mut events = match translate_server_message(&payload) {
            Ok(events) => VecDeque::from(events),
            Err(e) => return Some(Err(e)),
        };
        let first = events.pop_front()?;
        self.pending.lock().extend(events);
        Some(Ok(first))
    }

    async fn close(&self) -> Result<()> {
        if !self.open.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        self.outbound
            .lock()
            .await
            .send(Message::Close(None))
            .await
            .map_err(|e| RealtimeError::connection(format!("close failed: {e}")))
    }
}

impl std::fmt::Debug for GeminiRealtimeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiRealtimeSession")
            .field("session_id", &self.session_id)
            .field("open", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_live_endpoint_encodes_key() {
        let url = live_endpoint("a+b/c&d=e").unwrap();
        assert!(url.as_str().ends_with("BidiGenerateContent?key=a%2Bb%2Fc%26d%3De"));
        let (name, value) = url.query_pairs().next().unwrap();
        assert_eq!((name.as_ref(), value.as_ref()), ("key", "a+b/c&d=e"));
        assert_eq!(url.query_pairs().count(), 1);
    }

    #[test]
    fn test_setup_message_shape() {
        let message = ClientMessage::Setup(build_setup(LiveConfig::default()));
        let value = serde_json::to_value(&message).unwrap();
        let setup = &value["setup"];

        assert_eq!(setup["model"], "models/gemini-2.5-flash-native-audio-preview-09-2025");
        assert_eq!(setup["generationConfig"]["responseModalities"], json!(["AUDIO"]));
        assert_eq!(
            setup["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Zephyr"
        );
        assert!(
            setup["systemInstruction"]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("brainstorm app ideas")
        );
    }

    #[test]
    fn test_realtime_input_shape() {
        let message = ClientMessage::RealtimeInput(RealtimeInput {
            media_chunks: vec![Blob::new("audio/pcm;rate=16000", "AAA=")],
        });
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "realtimeInput": {
                    "mediaChunks": [{ "mimeType": "audio/pcm;rate=16000", "data": "AAA=" }]
                }
            })
        );
    }

    #[test]
    fn test_translate_setup_complete() {
        let events = translate_server_message(r#"{"setupComplete":{}}"#).unwrap();
        assert_eq!(events, vec![ServerEvent::SetupComplete]);
    }

    #[test]
    fn test_translate_multiple_parts_then_interrupt() {
        let raw = json!({
            "serverContent": {
                "modelTurn": { "parts": [
                    { "inlineData": { "mimeType": "audio/pcm;rate=24000", "data": "AQA=" } },
                    { "inlineData": { "mimeType": "audio/pcm;rate=24000", "data": "AgA=" } }
                ]},
                "interrupted": true
            }
        })
        .to_string();

        let events = translate_server_message(&raw).unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], ServerEvent::AudioDelta { data, .. } if data[..] == [1, 0]));
        assert!(matches!(&events[1], ServerEvent::AudioDelta { data, .. } if data[..] == [2, 0]));
        assert_eq!(events[2], ServerEvent::Interrupted);
    }

    #[test]
    fn test_translate_text_and_turn_complete() {
        let raw = json!({
            "serverContent": {
                "modelTurn": { "parts": [{ "text": "Try a Flask to-do app." }] },
                "turnComplete": true
            }
        })
        .to_string();
        let events = translate_server_message(&raw).unwrap();
        assert_eq!(
            events,
            vec![
                ServerEvent::TextDelta { text: "Try a Flask to-do app.".to_string() },
                ServerEvent::TurnComplete,
            ]
        );
    }

    #[test]
    fn test_translate_skips_bad_audio() {
        let raw = json!({
            "serverContent": { "modelTurn": { "parts": [{ "inlineData": { "data": "%%%" } }] } }
        })
        .to_string();
        assert_eq!(translate_server_message(&raw).unwrap(), vec![ServerEvent::Unknown]);
    }

    #[test]
    fn test_translate_rejects_non_json() {
        assert!(matches!(
            translate_server_message("not json"),
            Err(RealtimeError::MessageError(_))
        ));
    }
}
