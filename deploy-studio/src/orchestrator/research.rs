use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use studio_gemini::{GenerationResponse, Model, Tool};
use tracing::{debug, instrument};

use super::{Studio, require_text};
use crate::error::{Result, StudioError};

/// Model used for grounded research.
pub const RESEARCH_MODEL: Model = Model::Gemini25Flash;

/// A web page the answer was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Answer to a research query with its citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub text: String,
    pub sources: Vec<Source>,
}

impl ResearchResult {
    fn from_response(response: &GenerationResponse) -> Result<Self> {
        let text = response.text();
        if text.trim().is_empty() {
            return Err(StudioError::ContractViolation(
                "research response contained no text".to_string(),
            ));
        }
        Ok(Self { text, sources: collect_sources(response) })
    }
}

fn wrap_query(query: &str) -> String {
    format!(
        "Research the following question about Python tooling and deployment. \
         Give a concise, practical answer with current best practices and name the \
         libraries or services you recommend.\n\nQuestion: {query}"
    )
}

/// Web citations in order of first appearance, one per uri.
fn collect_sources(response: &GenerationResponse) -> Vec<Source> {
    let Some(chunks) = response.grounding_metadata().and_then(|m| m.grounding_chunks.as_ref())
    else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref()?.trim();
            if uri.is_empty() || !seen.insert(uri.to_string()) {
                return None;
            }
            let title = web
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(uri);
            Some(Source { title: title.to_string(), uri: uri.to_string() })
        })
        .collect()
}

impl Studio {
    /// Ask a search-grounded question about a tech stack.
    #[instrument(skip_all)]
    pub async fn research_tech_stack(&self, query: &str) -> Result<ResearchResult> {
        let query = require_text(query, "research question")?;
        let response = self
            .client()?
            .generate_content()
            .with_model(RESEARCH_MODEL)
            .with_user_message(wrap_query(query))
            .with_tool(Tool::google_search())
            .execute()
            .await?;

        let result = ResearchResult::from_response(&response)?;
        debug!(sources = result.sources.len(), "research answered");
        Ok(result)
    }
}
