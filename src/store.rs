use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tempfile::NamedTempFile;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("No result stored at {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<tempfile::PersistError> for StoreError {
    fn from(e: tempfile::PersistError) -> Self {
        StoreError::Io(e.error)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq)]
pub struct Stored {
    /// Writes made by this process so far; 0 means the file predates it
    pub version: u64,
    pub body: Vec<u8>,
}

/// A single JSON document on disk, replaced whole on every write.
///
/// Writes go to a temporary file beside the target which is then renamed over
/// it, so readers see either the previous document or the new one.
#[derive(Clone, Debug)]
pub struct ResultStore {
    path: PathBuf,
    version: Arc<AtomicU64>,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            version: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    pub async fn put<T: Serialize>(&self, value: &T) -> StoreResult<u64> {
        let body = serde_json::to_vec(value)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&path, &body))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))??;

        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("Stored result v{} at {}", version, self.path.display());
        Ok(version)
    }

    pub async fn get(&self) -> StoreResult<Stored> {
        // read the version first so a concurrent put can only make the body newer
        let version = self.version();

        match tokio::fs::read(&self.path).await {
            Ok(body) => Ok(Stored { version, body }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(self.path.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn replace_file(path: &Path, body: &[u8]) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(body)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
