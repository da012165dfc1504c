//! Configuration for language model backends

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::LlmError;

/// Default OpenAI-compatible API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model name
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default sampling temperature; 0.0 keeps completions as repeatable as the backend allows
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
/// Default completion length limit
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Which API shape the backend speaks.
///
/// Chosen explicitly by configuration; the model name plays no part in the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    /// Text completion endpoint (`/completions`)
    Completion,
    /// Chat completion endpoint (`/chat/completions`)
    #[default]
    Chat,
}

impl LlmBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completion => "completion",
            Self::Chat => "chat",
        }
    }
}

impl fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmBackend {
    type Err = LlmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "completion" => Ok(Self::Completion),
            "chat" => Ok(Self::Chat),
            other => Err(LlmError::InvalidConfig(format!(
                "unknown backend '{other}', expected 'completion' or 'chat'"
            ))),
        }
    }
}

/// Settings for building a [`CompletionClient`](crate::CompletionClient)
#[derive(Clone, PartialEq)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LlmConfig {
    /// Join an endpoint path onto the configured base URL
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

// Keeps the API key out of logs
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("backend", &self.backend)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
