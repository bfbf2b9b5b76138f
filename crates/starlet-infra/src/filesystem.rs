//! Filesystem adapters for Starlet.
//!
//! Implements the `ArtifactStore` trait from `starlet-core` on top of a local
//! output directory.

use std::path::{Path, PathBuf};

use starlet_core::tool::store::ArtifactStore;

/// Writes artifacts into one directory via `tokio::fs`.
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for LocalArtifactStore {
    async fn write_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, std::io::Error> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), len = bytes.len(), "Wrote artifact");
        Ok(path)
    }
}
