//! # studio-gemini
//!
//! Typed client for the Gemini `generateContent` REST endpoint, covering what
//! Deploy Studio sends: structured JSON output, thinking budgets, Google
//! Search grounding and single-voice speech synthesis.
//!
//! ```rust,no_run
//! use studio_gemini::{Gemini, Model};
//!
//! # async fn run() -> Result<(), studio_gemini::ClientError> {
//! let client = Gemini::builder("api-key").with_model(Model::Gemini25Flash).build()?;
//! let response = client
//!     .generate_content()
//!     .with_system_prompt("You answer in one sentence.")
//!     .with_user_message("What is Flask?")
//!     .execute()
//!     .await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```
//!
//! Requests go through a [`GeminiBackend`](backend::GeminiBackend), so tests
//! can swap the HTTP transport for [`MockBackend`](backend::mock::MockBackend).

pub mod backend;
pub mod builder;
pub mod client;
pub mod common;
pub mod error;
pub mod generation;
pub mod tools;
mod types;

pub use builder::GeminiBuilder;
pub use client::GeminiClient;
pub use client::GeminiClient as Gemini;
pub use common::Model;
pub use error::Error as ClientError;
pub use generation::builder::ContentBuilder;
pub use generation::model::{
    BlockReason, Candidate, FinishReason, GenerateContentRequest, GenerationConfig,
    GenerationResponse, GroundingChunk, GroundingMetadata, PrebuiltVoiceConfig, PromptFeedback,
    SpeechConfig, ThinkingConfig, UsageMetadata, VoiceConfig, WebGroundingChunk,
};
pub use tools::model::{GoogleSearchConfig, Tool};
pub use types::{Blob, Content, GeminiLiveBackend, Modality, Part, Role};
