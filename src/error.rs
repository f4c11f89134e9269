use thiserror::Error;

use crate::repository::RepositoryError;
use crate::version::error::RangeError;

/// Fatal outcome of a `check` or `out` invocation
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Error when parsing request from concourse: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("{failed} files failed to upload ({uploaded} uploaded)")]
    UploadFailed { uploaded: usize, failed: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
