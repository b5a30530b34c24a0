use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("A repository already exists at {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),
    #[error("Unsupported repository version {found} (supported: {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    #[error("Corrupt repository at {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("Nothing could be retrieved from the remote service")]
    RemoteUnavailable,
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RepoError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        RepoError::Corrupt { path: path.into(), reason: reason.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RepoError::Io { path: path.into(), source }
    }

    /// Only a failed remote fetch is worth retrying on a later run
    pub fn is_retryable(&self) -> bool {
        matches!(self, RepoError::RemoteUnavailable)
    }
}
