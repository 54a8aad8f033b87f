use std::sync::Arc;
use tracing::instrument;

use crate::backend::GeminiBackend;
use crate::builder::GeminiBuilder;
use crate::common::Model;
use crate::error::Error;
use crate::generation::{ContentBuilder, GenerateContentRequest, GenerationResponse};

/// Client for the Gemini API.
///
/// Cheap to clone; clones share the underlying backend.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    model: Model,
    backend: Arc<dyn GeminiBackend>,
}

impl GeminiClient {
    /// Start building a client authenticated with an API key.
    pub fn builder(key: impl Into<String>) -> GeminiBuilder {
        GeminiBuilder::new(key)
    }

    /// Shorthand for `builder(key).build()` with the default model.
    pub fn new(key: impl Into<String>) -> Result<Self, Error> {
        Self::builder(key).build()
    }

    /// Wrap an existing backend (e.g. [`MockBackend`](crate::backend::mock::MockBackend)).
    pub fn with_backend(backend: Arc<dyn GeminiBackend>) -> Self {
        Self { model: Model::default(), backend }
    }

    /// Change the default model used by requests built from this client.
    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Start a content generation request.
    pub fn generate_content(&self) -> ContentBuilder {
        ContentBuilder::new(self.clone())
    }

    #[instrument(skip_all, fields(model = %model))]
    pub(crate) async fn execute(
        &self,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error> {
        self.backend.generate_content(model, request).await
    }
}
