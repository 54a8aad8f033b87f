//! Google AI Studio REST transport.

use std::sync::LazyLock;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use tracing::{debug, instrument};
use url::Url;

use crate::backend::GeminiBackend;
use crate::common::Model;
use crate::error::{
    BadResponseSnafu, BuildHttpClientSnafu, ConstructUrlSnafu, DecodeResponseSnafu,
    DeserializeSnafu, Error, InvalidApiKeySnafu, MissingApiKeySnafu, PerformRequestSnafu,
};
use crate::generation::model::{GenerateContentRequest, GenerationResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub(crate) static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://generativelanguage.googleapis.com/v1beta/")
        .expect("unreachable error: failed to parse default base URL")
});

/// Sends `models/{model}:generateContent` requests with the key in a header.
#[derive(Debug)]
pub struct StudioBackend {
    http: Client,
    base_url: Url,
}

impl StudioBackend {
    pub fn new(api_key: &str, base_url: Option<Url>) -> Result<Self, Error> {
        Self::with_client_builder(api_key, base_url, ClientBuilder::default())
    }

    pub fn with_client_builder(
        api_key: &str,
        base_url: Option<Url>,
        http: ClientBuilder,
    ) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return MissingApiKeySnafu.fail();
        }

        let mut key = HeaderValue::from_str(api_key).context(InvalidApiKeySnafu)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        Ok(Self {
            http: http.default_headers(headers).build().context(BuildHttpClientSnafu)?,
            base_url: base_url
                .map(with_trailing_slash)
                .unwrap_or_else(|| DEFAULT_BASE_URL.clone()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, model: &Model, method: &str) -> Result<Url, Error> {
        let suffix = format!("models/{}:{method}", model.id());
        self.base_url.join(&suffix).context(ConstructUrlSnafu { suffix })
    }

    async fn post<B, T>(&self, url: Url, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .context(PerformRequestSnafu { url })?;
        let bytes = ensure_success(response).await?.bytes().await.context(DecodeResponseSnafu)?;
        serde_json::from_slice(&bytes).context(DeserializeSnafu)
    }
}

/// `Url::join` replaces the last segment of a base without a trailing slash,
/// so `https://proxy/v1beta` becomes `https://proxy/v1beta/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn ensure_success(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let description = response.text().await.ok().filter(|body| !body.is_empty());
    BadResponseSnafu { code: status.as_u16(), description }.fail()
}

#[async_trait]
impl GeminiBackend for StudioBackend {
    #[instrument(skip_all, fields(model = %model))]
    async fn generate_content(
        &self,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error> {
        let url = self.endpoint(model, "generateContent")?;
        debug!(%url, "posting generateContent");
        self.post(url, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_models_prefix() {
        let backend = StudioBackend::new("key", None).unwrap();
        let url = backend.endpoint(&Model::Gemini25Pro, "generateContent").unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn test_blank_key_rejected() {
        let err = StudioBackend::new("  ", None).unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[test]
    fn test_custom_base_url_kept() {
        let base = Url::parse("http://localhost:8080/proxy/").unwrap();
        let backend = StudioBackend::new("key", Some(base.clone())).unwrap();
        assert_eq!(backend.base_url(), &base);
        let url = backend.endpoint(&Model::Gemini25Flash, "generateContent").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/models/gemini-2.5-flash:generateContent");
    }

    #[test]
    fn test_base_url_without_trailing_slash_keeps_last_segment() {
        let base = Url::parse("https://proxy.example/v1beta").unwrap();
        let backend = StudioBackend::new("key", Some(base)).unwrap();
        assert_eq!(backend.base_url().as_str(), "https://proxy.example/v1beta/");
        let url = backend.endpoint(&Model::Gemini25Flash, "generateContent").unwrap();
        assert_eq!(
            url.as_str(),
            "https://proxy.example/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
