//! # deploy-studio
//!
//! Turn a plain-language app description into a runnable Python project with
//! Gemini, research a tech stack with search grounding, have the setup
//! instructions read aloud, or brainstorm through a live voice session.
//!
//! ```rust,no_run
//! use deploy_studio::{GenerationMode, Studio, StudioConfig};
//!
//! # async fn run() -> deploy_studio::Result<()> {
//! let studio = Studio::new(StudioConfig::from_env()?)?;
//! let project = studio
//!     .generate_project("REST API calculator with a history log", GenerationMode::Fast)
//!     .await?;
//! for file in &project.files {
//!     println!("{}", file.filename);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod project;
pub mod render;
pub mod voice;

pub use config::StudioConfig;
pub use error::{Result, StudioError};
pub use orchestrator::{
    GenerationMode, ModeSettings, ResearchResult, Source, SpeechAudio, Studio,
};
pub use project::{GeneratedProject, ProjectFile, SUGGESTIONS};
