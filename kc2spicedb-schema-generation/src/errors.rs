//! Error types for realm export decoding and file handling.

use std::path::{Path, PathBuf};

use serde_json::error::Category;
use thiserror::Error;

/// Errors produced while turning a stored realm export into a [`Realm`](crate::Realm).
///
/// Schema generation itself never fails for a well-formed realm, so every variant here
/// belongs to the input side: unreadable files, text that is not JSON, or JSON whose shape
/// does not match a Keycloak realm export.
#[derive(Debug, Error)]
pub enum SchemaGenerationError {
    /// The input text is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The input is JSON, but a present field has the wrong type or shape.
    #[error("Malformed realm export: {0}")]
    MalformedExport(#[source] serde_json::Error),

    /// A filesystem operation failed.
    #[error("Failed to {operation} '{}': {source}", path.display())]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaGenerationError {
    /// Create a filesystem error with the failed operation and path
    pub fn file_system(
        operation: impl Into<String>,
        path: impl AsRef<Path>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for SchemaGenerationError {
    fn from(error: serde_json::Error) -> Self {
        match error.classify() {
            Category::Data => Self::MalformedExport(error),
            Category::Io | Category::Syntax | Category::Eof => Self::InvalidJson(error),
        }
    }
}

/// Result type alias for operations that can fail with [`SchemaGenerationError`]
pub type Result<T> = std::result::Result<T, SchemaGenerationError>;
