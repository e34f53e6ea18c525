use crate::error::{AnalysisError, Result};
use crate::llm::types::*;
use crate::summary::NARRATION_SYSTEM_PROMPT;
use log::debug;
use reqwest::Client;
use std::time::Duration;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const NARRATION_TEMPERATURE: f32 = 0.4;

/// Minimal client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct NarrationClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl NarrationClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_BASE_URL.to_string(),
        })
    }

    /// Reads `OPENAI_API_KEY` and, optionally, `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AnalysisError::MissingApiKey)?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` under the analyst system prompt and returns the reply text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(NARRATION_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ],
            temperature: NARRATION_TEMPERATURE,
        };

        debug!("Requesting narration from {} with model {}", url, self.model);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(AnalysisError::Narration(format!(
                "Narration API error (status {}): {}",
                status, err_text
            )));
        }

        let body: ChatCompletionResponse = res.json().await?;
        Ok(body.text())
    }
}
