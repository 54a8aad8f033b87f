use serde::{Deserialize, Serialize};

/// A tool the model may call while answering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Tool {
    /// Ground answers in Google Search results
    GoogleSearch {
        #[serde(rename = "googleSearch")]
        google_search: GoogleSearchConfig,
    },
}

impl Tool {
    pub fn google_search() -> Self {
        Tool::GoogleSearch { google_search: GoogleSearchConfig {} }
    }
}

/// Empty configuration object for the Google Search tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GoogleSearchConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_search_wire_format() {
        let value = serde_json::to_value(Tool::google_search()).unwrap();
        assert_eq!(value, serde_json::json!({ "googleSearch": {} }));
    }
}
