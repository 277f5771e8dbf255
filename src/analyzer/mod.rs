//! LLM-backed paper assessment.
//!
//! [`Analyzer::analyze`] renders a language-specific prompt, calls the
//! completion capability and parses the JSON object it returns. Every failure
//! is reported as an [`AnalysisError`]; callers decide how to degrade.

mod completion;
mod prompts;

pub use completion::{CompletionClient, CompletionRequest, OpenAiCompatibleClient};
pub use prompts::{build_prompt, Prompt};

use serde::Deserialize;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::models::{AnalysisResult, Language, Paper};

/// Errors from a single analysis attempt
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// No API key configured for a remote endpoint
    #[error("No API key configured for the completion service")]
    MissingApiKey,

    /// Network or transport failure
    #[error("Request error: {0}")]
    Request(String),

    /// Non-success HTTP status from the completion service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered without any message content
    #[error("Completion returned no content")]
    EmptyResponse,

    /// The content was not the expected JSON object
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Expected shape of the model's answer
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    keywords: Vec<String>,
    score: u32,
    summary: String,
    reason: String,
}

/// Scores and summarizes papers through a completion client
#[derive(Debug, Clone)]
pub struct Analyzer {
    client: Arc<dyn CompletionClient>,
    model: String,
    temperature: f32,
}

impl Analyzer {
    /// Create an analyzer using `client` with the given model settings
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
        }
    }

    /// Create an analyzer talking to the configured OpenAI-compatible endpoint
    pub fn from_config(config: &LlmConfig) -> Result<Self, AnalysisError> {
        let client = OpenAiCompatibleClient::new(config)?;
        Ok(Self::new(Arc::new(client), &config.model, config.temperature))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Assess one paper
    pub async fn analyze(
        &self,
        paper: &Paper,
        language: Language,
    ) -> Result<AnalysisResult, AnalysisError> {
        let prompt = build_prompt(language, &paper.title, &paper.r#abstract);
        let request = CompletionRequest {
            model: self.model.clone(),
            system: prompt.system,
            user: prompt.user,
            temperature: self.temperature,
        };

        let content = self.client.complete(&request).await?;
        parse_analysis(&content)
    }
}

/// Remove a leading ```` ```json ```` (or bare fence) and a trailing fence
fn strip_code_fence(content: &str) -> &str {
    let mut text = content.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse the model's reply strictly as the expected JSON object
pub fn parse_analysis(content: &str) -> Result<AnalysisResult, AnalysisError> {
    let raw: RawAnalysis = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    Ok(AnalysisResult {
        keywords: raw.keywords,
        score: raw.score,
        summary: raw.summary,
        reason: raw.reason,
    })
}
