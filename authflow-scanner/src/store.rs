use crate::error::{Result, StoreError};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Text-file access used by the CLI for configuration sources, snapshots and
/// generated output.
pub trait ConfigStore: Send + Sync {
    fn read_text(&self, path: &Path) -> impl Future<Output = Result<String>> + Send;

    fn write_text(&self, path: &Path, content: &str) -> impl Future<Output = Result<()>> + Send;

    /// A missing file reads as `None`; other failures still propagate.
    fn read_if_exists(&self, path: &Path) -> impl Future<Output = Result<Option<String>>> + Send {
        async move {
            match self.read_text(path).await {
                Ok(text) => Ok(Some(text)),
                Err(StoreError::NotFound(_)) => Ok(None),
                Err(e) => Err(e),
            }
        }
    }
}

/// [`ConfigStore`] over the local file system. Relative paths resolve
/// against `root`; absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn current_dir() -> Result<Self> {
        let root = std::env::current_dir().map_err(|e| StoreError::from_io(".", e))?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        if path.as_os_str().is_empty() {
            return Err(StoreError::InvalidPath("empty path".to_string()));
        }
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        Ok(self.root.join(path))
    }
}

impl ConfigStore for FsStore {
    async fn read_text(&self, path: &Path) -> Result<String> {
        let full = self.resolve(path)?;
        debug!("Reading {}", full.display());
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| StoreError::from_io(full, e))
    }

    async fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        let full = self.resolve(path)?;
        if full.is_dir() {
            return Err(StoreError::InvalidPath(format!(
                "{} is a directory",
                full.display()
            )));
        }
        if let Some(parent) = full.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::from_io(parent, e))?;
        }

        debug!("Writing {} bytes to {}", content.len(), full.display());
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| StoreError::from_io(full, e))
    }
}
