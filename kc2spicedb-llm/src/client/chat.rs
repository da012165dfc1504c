//! Adapter for the chat completion endpoint

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CompletionClient, HttpBackend};
use crate::config::LlmConfig;
use crate::error::{LlmError, LlmResult};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatRequestMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for `POST {base_url}/chat/completions`.
///
/// The prompt is sent as a single user message.
#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    backend: HttpBackend,
}

impl OpenAiChatClient {
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        Ok(Self {
            backend: HttpBackend::new(config)?,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiChatClient {
    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let config = self.backend.config();
        let request = ChatRequest {
            model: &config.model,
            messages: [ChatRequestMessage {
                role: "user",
                content: prompt,
            }],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let response: ChatResponse = self
            .backend
            .post_json("chat/completions", &request)
            .await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or(LlmError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.backend.config().model
    }
}
