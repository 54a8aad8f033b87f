use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use studio_gemini::{ContentBuilder, Model};
use tracing::{info, instrument};

use super::{Studio, require_text};
use crate::error::Result;
use crate::project::{GeneratedProject, project_schema};

/// Persona for project generation.
pub const SYSTEM_INSTRUCTION: &str = r#"You are an expert Senior Python Engineer and DevOps specialist.
Your goal is to generate complete, production-ready Python applications based on user descriptions.

Guidelines:
1. **Frameworks:** Prefer Flask for web apps, or standard libraries for CLI tools unless specified otherwise.
2. **Structure:** Always include a 'requirements.txt' file for dependencies.
3. **Quality:** Code must be modular, follow PEP8, include comments, and handle basic errors.
4. **Language:** If the user speaks Indonesian, provide the instructions and description in Indonesian, but keep code comments in English or Indonesian (optional).
5. **Completeness:** The code should be ready to run. Do not use placeholders like "insert logic here" unless absolutely necessary. Implement the logic.
6. **Files:** Typically generate 'app.py' (or main.py), 'requirements.txt', and optional 'README.md' or HTML templates if needed.

If the user asks for a specific feature (e.g., "AI text summarizer"), mock the AI part using a simple function or suggest a real library like HuggingFace if simple enough, but prioritize running code."#;

const TEMPERATURE: f32 = 0.2;
const MAX_OUTPUT_TOKENS: i32 = 8192;
const THINKING_BUDGET: i32 = 32768;

/// Speed/quality trade-off for project generation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Lowest latency
    Fast,
    /// Balanced
    #[default]
    Standard,
    /// Large reasoning budget, no output cap
    Thinking,
}

/// Model and limits a mode resolves to.
///
/// A thinking budget and an output cap are never both set.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSettings {
    pub model: Model,
    pub temperature: f32,
    pub max_output_tokens: Option<i32>,
    pub thinking_budget: Option<i32>,
}

impl GenerationMode {
    pub fn settings(self) -> ModeSettings {
        match self {
            Self::Fast => ModeSettings {
                model: Model::Gemini25FlashLite,
                temperature: TEMPERATURE,
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
                thinking_budget: None,
            },
            Self::Standard => ModeSettings {
                model: Model::Gemini25Flash,
                temperature: TEMPERATURE,
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
                thinking_budget: None,
            },
            Self::Thinking => ModeSettings {
                model: Model::Gemini25Pro,
                temperature: TEMPERATURE,
                max_output_tokens: None,
                thinking_budget: Some(THINKING_BUDGET),
            },
        }
    }

    fn apply(self, builder: ContentBuilder) -> ContentBuilder {
        let settings = self.settings();
        let mut builder = builder.with_model(settings.model).with_temperature(settings.temperature);
        if let Some(max) = settings.max_output_tokens {
            builder = builder.with_max_output_tokens(max);
        }
        if let Some(budget) = settings.thinking_budget {
            builder = builder.with_thinking_budget(budget);
        }
        builder
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fast => "fast",
            Self::Standard => "standard",
            Self::Thinking => "thinking",
        })
    }
}

impl Studio {
    /// Generate a runnable Python project from a description.
    #[instrument(skip(self, prompt), fields(mode = %mode))]
    pub async fn generate_project(
        &self,
        prompt: &str,
        mode: GenerationMode,
    ) -> Result<GeneratedProject> {
        let prompt = require_text(prompt, "description of the app to build")?;
        let client = self.client()?;

        let request = mode
            .apply(client.generate_content())
            .with_system_prompt(SYSTEM_INSTRUCTION)
            .with_user_message(prompt)
            .with_response_schema(project_schema());

        info!(model = %request.model(), "generating project");
        let response = request.execute().await?;
        GeneratedProject::from_model_text(&response.text())
    }
}
