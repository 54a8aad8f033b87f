use std::sync::Arc;

use reqwest::{ClientBuilder, Url};

use crate::backend::studio::{DEFAULT_BASE_URL, StudioBackend};
use crate::client::GeminiClient;
use crate::common::Model;
use crate::error::Error;

/// Configures a [`GeminiClient`] talking to the AI Studio REST API.
///
/// ```rust,no_run
/// use studio_gemini::{GeminiBuilder, Model};
///
/// let client = GeminiBuilder::new("api-key")
///     .with_model(Model::Gemini25FlashLite)
///     .build()
///     .expect("valid key");
/// ```
pub struct GeminiBuilder {
    api_key: String,
    model: Model,
    base_url: Option<Url>,
    http: ClientBuilder,
}

impl GeminiBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Model::default(),
            base_url: None,
            http: ClientBuilder::default(),
        }
    }

    /// Model used when a request does not pick its own.
    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    /// Tweak timeouts, proxies and the like.
    pub fn with_http_client(mut self, http: ClientBuilder) -> Self {
        self.http = http;
        self
    }

    /// Point at a proxy or a local mock server. Model paths are joined onto
    /// it; a missing trailing slash is added.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Fails with [`Error::MissingApiKey`] on a blank key.
    pub fn build(self) -> Result<GeminiClient, Error> {
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.clone());
        let backend = StudioBackend::with_client_builder(&self.api_key, Some(base_url), self.http)?;
        Ok(GeminiClient::with_backend(Arc::new(backend)).with_model(self.model))
    }
}
