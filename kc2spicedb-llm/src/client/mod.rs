//! Completion clients: one capability trait, one adapter per API shape

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{LlmBackend, LlmConfig};
use crate::error::{LlmError, LlmResult};

mod chat;
mod completion;

pub use chat::OpenAiChatClient;
pub use completion::OpenAiCompletionClient;

/// Given a prompt, return a completion or fail.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the prompt and return the raw completion text
    async fn complete(&self, prompt: &str) -> LlmResult<String>;

    /// Name of the model answering the prompts
    fn model_name(&self) -> &str;
}

/// Build the adapter selected by `config.backend`
pub fn build_client(config: &LlmConfig) -> LlmResult<Box<dyn CompletionClient>> {
    debug!(
        "Building {} client for model '{}' at {}",
        config.backend, config.model, config.base_url
    );
    match config.backend {
        LlmBackend::Completion => Ok(Box::new(OpenAiCompletionClient::new(config.clone())?)),
        LlmBackend::Chat => Ok(Box::new(OpenAiChatClient::new(config.clone())?)),
    }
}

/// HTTP plumbing shared by the adapters
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    http: reqwest::Client,
    config: LlmConfig,
}

impl HttpBackend {
    pub(crate) fn new(config: LlmConfig) -> LlmResult<Self> {
        if config.model.trim().is_empty() {
            return Err(LlmError::InvalidConfig("model name must not be empty".to_string()));
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub(crate) fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// POST a JSON body to `path` under the base URL and decode the JSON answer
    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B) -> LlmResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let url = self.config.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(LlmError::Decode)
    }
}
