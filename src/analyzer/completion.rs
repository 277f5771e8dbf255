//! Completion capability and its OpenAI-compatible implementation.
//!
//! Works with any endpoint that follows the chat completions API format
//! (OpenAI, DashScope compatible mode, Ollama, vLLM).

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::AnalysisError;
use crate::config::LlmConfig;
use crate::utils::HttpClient;

/// One chat completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Something that turns a system + user instruction into text
#[async_trait]
pub trait CompletionClient: Send + Sync + std::fmt::Debug {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AnalysisError>;
}

/// Client for OpenAI-compatible chat completion endpoints
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl OpenAiCompatibleClient {
    /// Create a client from configuration.
    ///
    /// Local endpoints (localhost, 127.0.0.1) may omit the API key.
    pub fn new(config: &LlmConfig) -> Result<Self, AnalysisError> {
        let is_local =
            config.base_url.contains("localhost") || config.base_url.contains("127.0.0.1");

        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                if is_local {
                    debug!("No API key set for local endpoint; using placeholder bearer token");
                    Some("local".to_string())
                } else {
                    None
                }
            })
            .ok_or(AnalysisError::MissingApiKey)?;

        let client = HttpClient::with_timeout(config.timeout())
            .map_err(|e| AnalysisError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url, api_key))
    }

    /// Create with an explicit HTTP client, endpoint and key
    pub fn with_client(client: HttpClient, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn parse_response(json: &Value) -> Result<String, AnalysisError> {
        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(AnalysisError::EmptyResponse)
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AnalysisError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": request.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
            "temperature": request.temperature,
            "stream": false,
        });

        debug!(url = %url, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Request(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: response_body.chars().take(200).collect(),
            });
        }

        let json: Value = serde_json::from_str(&response_body)
            .map_err(|e| AnalysisError::MalformedResponse(format!("Invalid JSON: {}", e)))?;

        Self::parse_response(&json)
    }
}
