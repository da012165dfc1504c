//! Per-file processing and bounded concurrent execution

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use kc2spicedb_llm::LlmTransformer;
use kc2spicedb_schema_generation::providers::{FileSystemProvider, JsonProvider};
use kc2spicedb_schema_generation::{Realm, RealmModelBuilder, SchemaGenerator};
use log::{debug, error, info, log_enabled, Level};

use crate::inputs::Job;

/// How schema text is produced from a realm
#[derive(Debug)]
pub(crate) enum Generator {
    Deterministic,
    Llm(LlmTransformer),
}

impl Generator {
    async fn generate(&self, realm: &Realm) -> String {
        match self {
            Self::Deterministic => SchemaGenerator::generate(realm),
            Self::Llm(transformer) => transformer.transform(realm).await,
        }
    }
}

/// Outcome counts of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Read one export, generate its schema and write the result
async fn process_file(job: &Job, generator: &Generator) -> Result<()> {
    info!("Processing {}", job.input.display());

    let content = FileSystemProvider::read_file(&job.input).await?;
    let realm = RealmModelBuilder::build_from_str(&content)
        .with_context(|| format!("Failed to parse realm export {}", job.input.display()))?;

    if log_enabled!(Level::Debug) {
        let dump = JsonProvider::stringify_pretty(&realm)?;
        debug!("Internal realm model for '{}':\n{}", realm.name, dump);
    }

    let schema = generator.generate(&realm).await;
    FileSystemProvider::write_file(&job.output, &format!("{schema}\n")).await?;

    info!(
        "Schema for {} written to {}",
        job.input.display(),
        job.output.display()
    );
    Ok(())
}

/// Process every job with at most `concurrency` files in flight.
///
/// A failing file is logged and counted; it never stops the others.
pub(crate) async fn process_all(jobs: &[Job], generator: &Generator, concurrency: usize) -> Summary {
    let results: Vec<bool> = stream::iter(jobs)
        .map(|job| async move {
            match process_file(job, generator).await {
                Ok(()) => true,
                Err(e) => {
                    error!("Error processing {}: {:#}", job.input.display(), e);
                    false
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let succeeded = results.iter().filter(|ok| **ok).count();
    Summary {
        succeeded,
        failed: results.len() - succeeded,
    }
}
