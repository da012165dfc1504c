//! Input discovery and output path planning

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use kc2spicedb_schema_generation::providers::FileSystemProvider;
use log::debug;

const INPUT_EXTENSION: &str = "json";
const SCHEMA_EXTENSION: &str = "zed";

/// One input export and where its schema goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Expand directories into their `*.json` files; other paths are taken as given.
pub(crate) async fn discover_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if FileSystemProvider::is_directory(path).await? {
            let found =
                FileSystemProvider::list_files_with_extension(path, INPUT_EXTENSION).await?;
            debug!("Found {} export file(s) in {}", found.len(), path.display());
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    if files.is_empty() {
        bail!("No valid input files found. Please specify a valid file or directory.");
    }
    Ok(files)
}

/// Decide the output path of every input.
///
/// A single input writes to `output` when given, otherwise next to the input. Several
/// inputs write `<stem>.zed` files into the `output` directory, or the current directory.
pub(crate) async fn plan_jobs(inputs: &[PathBuf], output: Option<&Path>) -> Result<Vec<Job>> {
    if let [input] = inputs {
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| input.with_extension(SCHEMA_EXTENSION));
        return Ok(vec![Job {
            input: input.clone(),
            output,
        }]);
    }

    let output_dir = match output {
        Some(dir) => {
            if FileSystemProvider::file_exists(dir).await?
                && !FileSystemProvider::is_directory(dir).await?
            {
                bail!(
                    "Output path must be a directory when processing multiple input files: {}",
                    dir.display()
                );
            }
            dir.to_path_buf()
        }
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };

    let jobs: Vec<Job> = inputs
        .iter()
        .map(|input| Job {
            input: input.clone(),
            output: output_dir.join(schema_file_name(input)),
        })
        .collect();

    let mut claimed: HashMap<&Path, &Path> = HashMap::new();
    for job in &jobs {
        if let Some(previous) = claimed.insert(&job.output, &job.input) {
            bail!(
                "Inputs {} and {} would both write {}",
                previous.display(),
                job.input.display(),
                job.output.display()
            );
        }
    }

    Ok(jobs)
}

fn schema_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schema".to_string());
    format!("{stem}.{SCHEMA_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_single_input_defaults_next_to_input() {
        let jobs = plan_jobs(&[PathBuf::from("exports/acme.json")], None)
            .await
            .unwrap();
        assert_eq!(
            jobs,
            vec![Job {
                input: PathBuf::from("exports/acme.json"),
                output: PathBuf::from("exports/acme.zed"),
            }]
        );
    }

    #[tokio::test]
    async fn test_single_input_uses_explicit_output() {
        let jobs = plan_jobs(
            &[PathBuf::from("acme.json")],
            Some(Path::new("schemas/custom.zed")),
        )
        .await
        .unwrap();
        assert_eq!(jobs[0].output, PathBuf::from("schemas/custom.zed"));
    }

    #[tokio::test]
    async fn test_multiple_inputs_go_to_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = [PathBuf::from("a/acme.json"), PathBuf::from("b/globex.json")];

        let jobs = plan_jobs(&inputs, Some(temp_dir.path())).await.unwrap();

        assert_eq!(jobs[0].output, temp_dir.path().join("acme.zed"));
        assert_eq!(jobs[1].output, temp_dir.path().join("globex.zed"));
    }

    #[tokio::test]
    async fn test_multiple_inputs_reject_file_output() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("existing.zed");
        std::fs::write(&file, "").unwrap();
        let inputs = [PathBuf::from("acme.json"), PathBuf::from("globex.json")];

        let error = plan_jobs(&inputs, Some(&file)).await.unwrap_err();
        assert!(error.to_string().contains("must be a directory"));
    }

    #[tokio::test]
    async fn test_colliding_outputs_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = [
            PathBuf::from("one/realm.json"),
            PathBuf::from("two/realm.json"),
        ];

        let error = plan_jobs(&inputs, Some(temp_dir.path())).await.unwrap_err();
        assert!(error.to_string().contains("would both write"));
    }

    #[tokio::test]
    async fn test_discover_inputs_expands_directories() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("readme.md"), "").unwrap();
        let explicit = PathBuf::from("explicit.json");

        let files = discover_inputs(&[temp_dir.path().to_path_buf(), explicit.clone()])
            .await
            .unwrap();

        assert_eq!(
            files,
            vec![
                temp_dir.path().join("a.json"),
                temp_dir.path().join("b.json"),
                explicit
            ]
        );
    }

    #[tokio::test]
    async fn test_discover_inputs_requires_files() {
        let temp_dir = TempDir::new().unwrap();
        let error = discover_inputs(&[temp_dir.path().to_path_buf()])
            .await
            .unwrap_err();
        assert!(error.to_string().contains("No valid input files found"));
    }
}
