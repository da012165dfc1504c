//! Adapter for the text completion endpoint

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CompletionClient, HttpBackend};
use crate::config::LlmConfig;
use crate::error::{LlmError, LlmResult};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: Option<String>,
}

/// Client for `POST {base_url}/completions`
#[derive(Debug, Clone)]
pub struct OpenAiCompletionClient {
    backend: HttpBackend,
}

impl OpenAiCompletionClient {
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        Ok(Self {
            backend: HttpBackend::new(config)?,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let config = self.backend.config();
        let request = CompletionRequest {
            model: &config.model,
            prompt,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let response: CompletionResponse = self.backend.post_json("completions", &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.text)
            .ok_or(LlmError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.backend.config().model
    }
}
