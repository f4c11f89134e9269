//! Artifact repository collaborator
//!
//! The discovery and publish drivers only see the [`Repository`] trait; the
//! Artifactory REST implementation lives in [`artifactory`].
//!
//! # Modules
//!
//! - [`artifactory`]: reqwest-based client (AQL search, PUT upload)
//! - [`spec`]: Search/upload specifications and pattern matching
//! - [`local`]: Enumerates local files selected by an upload spec

#[cfg(test)]
use mockall::automock;
use thiserror::Error;

pub mod artifactory;
pub mod local;
pub mod spec;

pub use artifactory::ArtifactoryClient;
pub use spec::{SearchSpec, UploadSpec};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid specification: {0}")]
    InvalidSpec(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of an upload run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub failed: usize,
    /// Repository paths of successfully uploaded files, sorted
    pub uploaded_paths: Vec<String>,
}

/// Trait for searching and publishing artifacts in a remote repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    /// Returns repository paths (`repo/dir/name`) of files matching `spec`
    async fn search(&self, spec: &SearchSpec) -> Result<Vec<String>, RepositoryError>;

    /// Uploads local files selected by `spec`
    ///
    /// Individual file failures are counted in the summary rather than
    /// returned as an error.
    async fn upload(&self, spec: &UploadSpec) -> Result<UploadSummary, RepositoryError>;
}
