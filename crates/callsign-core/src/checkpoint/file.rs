// # File Checkpoint Store
//
// File-based implementation of CheckpointStore.
//
// ## File Format
//
// The file contains exactly the last known IP address as plain text, with no
// structure, escaping or trailing newline:
//
// ```text
// 203.0.113.5
// ```
//
// ## Crash Behavior
//
// - Atomic writes: the new value is written to a temporary file, then renamed
// - A missing file is a valid first-run state, not an error

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::checkpoint_store::CheckpointStore;

/// File-based checkpoint store
///
/// # Example
///
/// ```rust,no_run
/// use callsign_core::checkpoint::FileCheckpointStore;
/// use callsign_core::traits::CheckpointStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileCheckpointStore::new("checkpoint.txt");
///
///     store.store("1.2.3.4").await?;
///     assert_eq!(store.load().await?, Some("1.2.3.4".to_string()));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    /// Create a store backed by the given file
    ///
    /// Nothing is touched on disk until the first `load()` or `store()`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the checkpoint file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    async fn ensure_parent_dir(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::storage_write(format!(
                    "Failed to create checkpoint directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
    async fn load(&self) -> Result<Option<String>, Error> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Checkpoint file does not exist: {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(Error::storage_read(format!(
                "Failed to read checkpoint file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn store(&self, ip: &str) -> Result<(), Error> {
        self.ensure_parent_dir().await?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::storage_write(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(ip.as_bytes()).await.map_err(|e| {
                Error::storage_write(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::storage_write(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::storage_write(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Checkpoint written to file: {}", self.path.display());
        Ok(())
    }
}
