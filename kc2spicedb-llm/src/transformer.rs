//! Language model schema generation with deterministic fallback

use kc2spicedb_schema_generation::{Realm, SchemaGenerator};
use log::{debug, error, info};

use crate::client::{build_client, CompletionClient};
use crate::config::LlmConfig;
use crate::error::{LlmError, LlmResult};
use crate::prompt::build_prompt;

/// Generates SpiceDB schemas by asking a language model, falling back to the
/// deterministic [`SchemaGenerator`] whenever the model call fails.
pub struct LlmTransformer {
    client: Box<dyn CompletionClient>,
}

impl LlmTransformer {
    pub fn new(client: Box<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Build a transformer around the client selected by `config`
    pub fn from_config(config: &LlmConfig) -> LlmResult<Self> {
        Ok(Self::new(build_client(config)?))
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Generate schema text for the realm. Never fails: any model error is logged and
    /// the deterministic schema is returned instead.
    pub async fn transform(&self, realm: &Realm) -> String {
        match self.try_transform(realm).await {
            Ok(schema) => schema,
            Err(e) => {
                error!("LLM transformation failed for realm '{}': {}", realm.name, e);
                let schema = SchemaGenerator::generate(realm);
                info!(
                    "Falling back to programmatic schema generation for realm '{}'.",
                    realm.name
                );
                schema
            }
        }
    }

    /// Generate schema text for the realm, surfacing model errors
    pub async fn try_transform(&self, realm: &Realm) -> LlmResult<String> {
        let prompt = build_prompt(realm);
        info!(
            "Generating schema via LLM for realm '{}' using model '{}'.",
            realm.name,
            self.model_name()
        );
        debug!("LLM prompt for realm '{}':\n{}", realm.name, prompt);

        let completion = self.client.complete(&prompt).await?;
        let schema = completion.trim();
        if schema.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        info!("LLM schema generation completed for realm '{}'.", realm.name);
        Ok(schema.to_string())
    }
}

impl std::fmt::Debug for LlmTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmTransformer")
            .field("model", &self.model_name())
            .finish()
    }
}
