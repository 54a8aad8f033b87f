//! Transports for `generateContent`.
//!
//! [`StudioBackend`](studio::StudioBackend) posts to the AI Studio REST API;
//! [`MockBackend`](mock::MockBackend) replays scripted replies.

pub mod mock;
pub mod studio;

use async_trait::async_trait;

use crate::common::Model;
use crate::error::Error;
use crate::generation::model::{GenerateContentRequest, GenerationResponse};

/// Executes one request against one model.
///
/// The model travels with each call, so one backend and its connection pool
/// serve every model a client uses.
#[async_trait]
pub trait GeminiBackend: Send + Sync + std::fmt::Debug {
    async fn generate_content(
        &self,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error>;
}
