use reqwest::header::InvalidHeaderValue;
use snafu::Snafu;
use url::Url;

/// Failures of the REST client, from building a request to parsing the reply.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("API key cannot be sent as an HTTP header"))]
    InvalidApiKey { source: InvalidHeaderValue },

    #[snafu(display("cannot build request URL from '{suffix}'"))]
    ConstructUrl { source: url::ParseError, suffix: String },

    #[snafu(display("cannot build HTTP client"))]
    BuildHttpClient { source: reqwest::Error },

    #[snafu(display("request to '{url}' failed"))]
    PerformRequest { source: reqwest::Error, url: Url },

    #[snafu(display(
        "server answered {code}: {}",
        description.as_deref().unwrap_or("no details")
    ))]
    BadResponse {
        /// HTTP status code
        code: u16,
        /// Response body, when there was one
        description: Option<String>,
    },

    #[snafu(display("response body is not a valid generateContent response"))]
    Deserialize { source: serde_json::Error },

    #[snafu(display("cannot read response body"))]
    DecodeResponse { source: reqwest::Error },

    #[snafu(display("no API key configured"))]
    MissingApiKey,

    #[snafu(display("configuration error: {message}"))]
    Configuration { message: String },
}

impl Error {
    /// True when the request was built but the exchange with the server
    /// failed or returned something unusable.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::PerformRequest { .. }
                | Error::BadResponse { .. }
                | Error::DecodeResponse { .. }
                | Error::Deserialize { .. }
        )
    }
}
