//! Native filesystem provider implementation using `tokio::fs`.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::errors::{Result, SchemaGenerationError};

/// Native filesystem provider using `tokio::fs` for async file operations.
///
/// Every error carries the failed operation and the path involved.
///
/// # Thread Safety
/// This provider is `Send + Sync` and can be safely shared across threads.
#[derive(Debug, Clone)]
pub struct NativeFileSystemProvider;

impl NativeFileSystemProvider {
    /// Read the entire contents of a file as a UTF-8 string.
    pub async fn read_file(path: impl AsRef<Path>) -> Result<String> {
        fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| SchemaGenerationError::file_system("read", path.as_ref(), e))
    }

    /// Write a string to a file, creating missing parent directories first.
    pub async fn write_file(path: impl AsRef<Path>, contents: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SchemaGenerationError::file_system("create directory", parent, e))?;
        }

        fs::write(path, contents)
            .await
            .map_err(|e| SchemaGenerationError::file_system("write", path, e))
    }

    /// Check if a file or directory exists.
    pub async fn file_exists(path: &Path) -> Result<bool> {
        match fs::metadata(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SchemaGenerationError::file_system("check existence", path, e)),
        }
    }

    /// Check if a path exists and is a directory.
    pub async fn is_directory(path: &Path) -> Result<bool> {
        match fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SchemaGenerationError::file_system("access", path, e)),
        }
    }

    /// List the files directly inside `dir` whose extension matches `extension`,
    /// ignoring ASCII case.
    ///
    /// Does not recurse. The result is sorted for consistent ordering.
    pub async fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| SchemaGenerationError::file_system("read directory", dir, e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SchemaGenerationError::file_system("read directory entry", dir, e))?
        {
            let path = entry.path();
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| SchemaGenerationError::file_system("read metadata", &path, e))?;

            let matches_extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

            if metadata.is_file() && matches_extension {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
