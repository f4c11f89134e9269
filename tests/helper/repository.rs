//! Repository test utilities

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use artifactory_resource::repository::local::collect_files;
use artifactory_resource::repository::{
    Repository, RepositoryError, SearchSpec, UploadSpec, UploadSummary,
};

/// In-memory repository for testing
///
/// Search filters the stored paths through the spec's matcher; upload
/// resolves local files like the real client and records where they would land.
#[derive(Default)]
pub struct FakeRepository {
    stored: Vec<String>,
    failing: HashSet<String>,
    uploads: Mutex<Vec<String>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(mut self, paths: &[&str]) -> Self {
        self.stored.extend(paths.iter().map(|p| p.to_string()));
        self
    }

    /// Make uploads of `file_name` fail
    pub fn failing_upload(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_string());
        self
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Repository for FakeRepository {
    async fn search(&self, spec: &SearchSpec) -> Result<Vec<String>, RepositoryError> {
        let prefix = format!("{}/", spec.repo);
        Ok(self
            .stored
            .iter()
            .filter(|path| {
                path.strip_prefix(&prefix)
                    .is_some_and(|relative| spec.matches(relative))
            })
            .cloned()
            .collect())
    }

    async fn upload(&self, spec: &UploadSpec) -> Result<UploadSummary, RepositoryError> {
        let mut summary = UploadSummary::default();
        for file in collect_files(spec)? {
            let name = file.file_name().unwrap().to_string_lossy().into_owned();
            if self.failing.contains(&name) {
                summary.failed += 1;
                continue;
            }
            let remote = format!("{}{}", spec.target, name);
            self.uploads.lock().unwrap().push(remote.clone());
            summary.uploaded += 1;
            summary.uploaded_paths.push(remote);
        }
        Ok(summary)
    }
}
