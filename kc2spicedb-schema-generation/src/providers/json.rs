//! Native JSON provider implementation using `serde_json`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Native JSON provider using `serde_json`.
///
/// All operations are stateless. Parse failures are classified into
/// [`InvalidJson`](crate::SchemaGenerationError::InvalidJson) for text that is not JSON
/// and [`MalformedExport`](crate::SchemaGenerationError::MalformedExport) for JSON of the
/// wrong shape.
///
/// Parsing has no nesting limit: deeply nested documents grow the stack on demand
/// instead of failing at serde_json's default depth of 128.
#[derive(Debug, Clone)]
pub struct NativeJsonProvider;

impl NativeJsonProvider {
    /// Parse JSON to a generic `serde_json::Value`, keeping object keys in source order.
    pub fn parse_to_value(json_str: &str) -> Result<serde_json::Value> {
        Self::parse(json_str)
    }

    /// Parse JSON string into a typed value.
    pub fn parse<T>(json_str: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut json = serde_json::Deserializer::from_str(json_str);
        json.disable_recursion_limit();
        let value = T::deserialize(serde_stacker::Deserializer::new(&mut json))?;
        json.end()?;
        Ok(value)
    }

    /// Serialize a value to pretty-printed JSON text.
    pub fn stringify_pretty<T>(value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Ok(serde_json::to_string_pretty(value)?)
    }
}
