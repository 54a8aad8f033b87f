//! Wire primitives shared by requests and responses.
//!
//! A [`Content`] is one conversation turn made of [`Part`]s. Parts are either
//! text or an inline [`Blob`]; anything else the API sends is preserved as raw
//! JSON so responses with tool calls still parse.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
        /// Set on thought summaries when thinking output is requested
        #[serde(skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
        #[serde(rename = "thoughtSignature", skip_serializing_if = "Option::is_none")]
        thought_signature: Option<String>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Other(serde_json::Value),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into(), thought: None, thought_signature: None }
    }
}

/// Base64 payload tagged with its MIME type, e.g. `audio/pcm;rate=24000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

impl Blob {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self { mime_type: mime_type.into(), data: data.into() }
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.data)
    }
}

/// One conversation turn.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Content {
    /// A turn holding a single text part and no role.
    pub fn text(text: impl Into<String>) -> Self {
        Self { parts: Some(vec![Part::text(text)]), role: None }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// Output format the model should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    ModalityUnspecified,
    Text,
    Image,
    Audio,
    #[serde(other)]
    Unknown,
}

/// Where a Gemini Live websocket session connects.
#[derive(Debug, Clone)]
pub enum GeminiLiveBackend {
    /// AI Studio endpoint authenticated with an API key
    Studio { api_key: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_part_untagged_variants() {
        let text: Part = serde_json::from_value(json!({ "text": "hi" })).unwrap();
        assert!(matches!(text, Part::Text { ref text, .. } if text == "hi"));

        let audio: Part = serde_json::from_value(json!({
            "inlineData": { "mimeType": "audio/pcm;rate=24000", "data": "AAA=" }
        }))
        .unwrap();
        assert!(matches!(audio, Part::InlineData { .. }));

        let call: Part =
            serde_json::from_value(json!({ "functionCall": { "name": "f", "args": {} } }))
                .unwrap();
        assert!(matches!(call, Part::Other(_)));
    }

    #[test]
    fn test_modality_wire_format() {
        assert_eq!(serde_json::to_value(Modality::Audio).unwrap(), json!("AUDIO"));
        let parsed: Modality = serde_json::from_value(json!("TEXT")).unwrap();
        assert_eq!(parsed, Modality::Text);
        let unknown: Modality = serde_json::from_value(json!("HOLOGRAM")).unwrap();
        assert_eq!(unknown, Modality::Unknown);
    }

    #[test]
    fn test_blob_decode() {
        let blob = Blob::new("audio/pcm", "AQID");
        assert_eq!(blob.decode().unwrap(), vec![1, 2, 3]);
    }
}
