//! CLI entry point for `kc2spicedb`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use kc2spicedb_llm::{
    LlmBackend, LlmConfig, LlmTransformer, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT,
};
use log::{error, info, warn};

mod inputs;
mod runner;

use runner::{Generator, Summary};

#[derive(Parser, Debug)]
#[command(
    name = "kc2spicedb",
    version,
    about = "Generate a SpiceDB schema from Keycloak realm export(s)."
)]
struct Cli {
    /// Keycloak realm JSON export files, or directories of export files
    #[arg(required = true, value_name = "INPUT")]
    input: Vec<PathBuf>,

    /// Output file (single input) or directory (multiple inputs)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable LLM integration and use deterministic schema generation only
    #[arg(long)]
    no_llm: bool,

    /// LLM API shape: `chat` or `completion`
    #[arg(long, default_value = "chat")]
    backend: LlmBackend,

    /// Model to use for LLM-based schema generation
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature for the LLM
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Maximum tokens for the LLM output
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_base_url: String,

    /// API key for the LLM backend
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// LLM request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Number of files to process concurrently. Use 1 to disable concurrency.
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    jobs: u16,

    /// Enable verbose logging for debugging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// LLM settings, or `None` when running deterministic-only
    fn llm_config(&self) -> Option<LlmConfig> {
        if self.no_llm {
            return None;
        }
        Some(LlmConfig {
            backend: self.backend,
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            api_key: self.api_key.clone(),
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}

async fn run(cli: Cli) -> Result<Summary> {
    let input_files = inputs::discover_inputs(&cli.input).await?;
    let jobs = inputs::plan_jobs(&input_files, cli.output.as_deref()).await?;

    let generator = match cli.llm_config() {
        None => Generator::Deterministic,
        Some(config) => {
            if config.api_key.is_none() {
                warn!("OPENAI_API_KEY environment variable is not set. OpenAI API calls may fail.");
            }
            let transformer = LlmTransformer::from_config(&config)
                .context("Failed to initialize the LLM backend")?;
            Generator::Llm(transformer)
        }
    };

    let summary = runner::process_all(&jobs, &generator, usize::from(cli.jobs)).await;
    info!(
        "Processing complete. Successful: {}, Failed: {}.",
        summary.succeeded, summary.failed
    );
    Ok(summary)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
