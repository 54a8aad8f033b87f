use serde_json::Value;
use tracing::debug;

use crate::client::GeminiClient;
use crate::common::Model;
use crate::error::Error;
use crate::generation::model::{
    GenerateContentRequest, GenerationConfig, GenerationResponse, SpeechConfig, ThinkingConfig,
};
use crate::tools::Tool;
use crate::types::{Content, Modality, Role};

/// Builder for a single `generateContent` call.
pub struct ContentBuilder {
    client: GeminiClient,
    model: Model,
    contents: Vec<Content>,
    system_instruction: Option<Content>,
    generation_config: Option<GenerationConfig>,
    tools: Vec<Tool>,
}

impl ContentBuilder {
    pub(crate) fn new(client: GeminiClient) -> Self {
        let model = client.model().clone();
        Self {
            client,
            model,
            contents: Vec::new(),
            system_instruction: None,
            generation_config: None,
            tools: Vec::new(),
        }
    }

    fn config(&mut self) -> &mut GenerationConfig {
        self.generation_config.get_or_insert_with(GenerationConfig::default)
    }

    /// Override the client's model for this request only.
    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, text: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::text(text));
        self
    }

    pub fn with_user_message(mut self, text: impl Into<String>) -> Self {
        self.contents.push(Content::text(text).with_role(Role::User));
        self
    }

    pub fn with_model_message(mut self, text: impl Into<String>) -> Self {
        self.contents.push(Content::text(text).with_role(Role::Model));
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config().temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max: i32) -> Self {
        self.config().max_output_tokens = Some(max);
        self
    }

    pub fn with_thinking_budget(mut self, budget: i32) -> Self {
        self.config().thinking_config = Some(ThinkingConfig::with_budget(budget));
        self
    }

    pub fn with_response_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.config().response_mime_type = Some(mime_type.into());
        self
    }

    /// Constrain the response to a JSON schema (implies `application/json`).
    pub fn with_response_schema(mut self, schema: Value) -> Self {
        let config = self.config();
        config.response_schema = Some(schema);
        config.response_mime_type.get_or_insert_with(|| "application/json".to_string());
        self
    }

    pub fn with_response_modalities(mut self, modalities: Vec<Modality>) -> Self {
        self.config().response_modalities = Some(modalities);
        self
    }

    /// Select a prebuilt voice for audio output.
    pub fn with_voice(mut self, voice_name: impl Into<String>) -> Self {
        self.config().speech_config = Some(SpeechConfig::prebuilt(voice_name));
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    /// The model this request targets.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Assemble the request body without sending it.
    pub fn build(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self.contents.clone(),
            system_instruction: self.system_instruction.clone(),
            generation_config: self.generation_config.clone(),
            tools: if self.tools.is_empty() { None } else { Some(self.tools.clone()) },
        }
    }

    pub async fn execute(self) -> Result<GenerationResponse, Error> {
        let request = self.build();
        debug!(model = %self.model, contents = request.contents.len(), "executing request");
        self.client.execute(&self.model, request).await
    }
}
