use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for the update pipeline. Every stage either recovers
/// internally or surfaces exactly one of these to the caller; no stage is
/// retried automatically.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("file system operation failed on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("no package record found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("malformed package record at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("package hash verification failed: {0}")]
    Integrity(String),

    #[error("deployment failed: {0}")]
    Deployment(String),

    #[error("install hook failed: {0:#}")]
    Install(anyhow::Error),

    #[error("archive extraction failed: {0:#}")]
    Unzip(anyhow::Error),

    #[error("application facts unavailable: {0:#}")]
    AppFacts(anyhow::Error),
}

impl UpdateError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
