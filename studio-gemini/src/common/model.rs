use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const FLASH: &str = "models/gemini-2.5-flash";
const FLASH_LITE: &str = "models/gemini-2.5-flash-lite";
const PRO: &str = "models/gemini-2.5-pro";
const FLASH_TTS: &str = "models/gemini-2.5-flash-preview-tts";

/// A Gemini model name in `models/<id>` form.
///
/// The variants are the models Deploy Studio routes requests to; anything
/// else round-trips through [`Model::Custom`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Model {
    /// Standard generation and research
    #[default]
    Gemini25Flash,
    /// Fast generation
    Gemini25FlashLite,
    /// Thinking generation
    Gemini25Pro,
    /// Speech synthesis
    Gemini25FlashPreviewTts,
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25Flash => FLASH,
            Model::Gemini25FlashLite => FLASH_LITE,
            Model::Gemini25Pro => PRO,
            Model::Gemini25FlashPreviewTts => FLASH_TTS,
            Model::Custom(name) => name,
        }
    }

    /// Name without the `models/` prefix, as it appears in URL paths.
    pub fn id(&self) -> &str {
        let name = self.as_str();
        name.strip_prefix("models/").unwrap_or(name)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Model {
    fn from(name: &str) -> Self {
        let bare = name.strip_prefix("models/").unwrap_or(name);
        match bare {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            "gemini-2.5-flash-preview-tts" => Model::Gemini25FlashPreviewTts,
            _ => Model::Custom(name.to_string()),
        }
    }
}

impl From<String> for Model {
    fn from(name: String) -> Self {
        Model::from(name.as_str())
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Model::from(s))
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Model::from)
    }
}
