//! Language model backed SpiceDB schema generation for kc2spicedb.
//!
//! A [`CompletionClient`] turns a prompt into a completion. Two adapters are provided,
//! one per OpenAI-compatible API shape, and [`build_client`] picks one from explicit
//! configuration. [`LlmTransformer`] renders the realm into a prompt, asks the client,
//! and falls back to the deterministic generator whenever the call fails.

mod client;
mod config;
mod error;
mod prompt;
mod transformer;

pub use client::{build_client, CompletionClient, OpenAiChatClient, OpenAiCompletionClient};
pub use config::{
    LlmBackend, LlmConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT,
};
pub use error::{LlmError, LlmResult};
pub use prompt::build_prompt;
pub use transformer::LlmTransformer;
