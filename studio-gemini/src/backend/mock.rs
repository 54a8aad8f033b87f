//! In-memory backend that records requests and replays queued responses.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::backend::GeminiBackend;
use crate::common::Model;
use crate::error::{ConfigurationSnafu, Error};
use crate::generation::model::{GenerateContentRequest, GenerationResponse};

/// A scripted [`GeminiBackend`].
///
/// Each call pops the next queued result. When the queue is empty the call
/// fails with a configuration error so a test notices the extra request.
#[derive(Debug, Default)]
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<GenerationResponse, Error>>>,
    requests: Mutex<Vec<(Model, GenerateContentRequest)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn with_response(self, response: GenerationResponse) -> Self {
        self.push(Ok(response));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: Error) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, result: Result<GenerationResponse, Error>) {
        self.responses.lock().unwrap_or_else(|e| e.into_inner()).push_back(result);
    }

    /// Every request seen so far, with the model it targeted.
    pub fn requests(&self) -> Vec<(Model, GenerateContentRequest)> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl GeminiBackend for MockBackend {
    async fn generate_content(
        &self,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push((model.clone(), request));
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                ConfigurationSnafu { message: "mock backend has no queued response" }.fail()
            })
    }
}
