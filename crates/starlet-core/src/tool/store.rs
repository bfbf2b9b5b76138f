//! ArtifactStore trait for persisting tool output.
//!
//! Defined in starlet-core so the image tool can save files without coupling
//! to the real filesystem. The `LocalArtifactStore` adapter lives in
//! starlet-infra.

use std::path::PathBuf;

/// Where generated artifacts are written.
pub trait ArtifactStore: Send + Sync {
    /// Write `bytes` under `file_name`, replacing any existing file.
    ///
    /// Returns the full path written.
    fn write_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf, std::io::Error>> + Send;
}
