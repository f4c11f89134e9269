//! Artifactory REST API implementation

use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use crate::config::Source;
use crate::repository::local::collect_files;
use crate::repository::spec::{SearchSpec, UploadSpec};
use crate::repository::{Repository, RepositoryError, UploadSummary};

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Response from the AQL search endpoint
#[derive(Debug, Deserialize)]
struct AqlResponse {
    results: Vec<AqlItem>,
}

#[derive(Debug, Deserialize)]
struct AqlItem {
    repo: String,
    path: String,
    name: String,
}

impl AqlItem {
    /// Path relative to the repository root
    fn relative_path(&self) -> String {
        if self.path.is_empty() || self.path == "." {
            self.name.clone()
        } else {
            format!("{}/{}", self.path, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Auth {
    None,
    Basic { user: String, password: String },
    ApiKey(String),
    Bearer(String),
}

impl Auth {
    fn from_source(source: &Source) -> Self {
        if !source.access_token.is_empty() {
            Auth::Bearer(source.access_token.clone())
        } else if !source.api_key.is_empty() {
            Auth::ApiKey(source.api_key.clone())
        } else if !source.user.is_empty() {
            Auth::Basic {
                user: source.user.clone(),
                password: source.password.clone(),
            }
        } else {
            Auth::None
        }
    }
}

/// Repository implementation for the Artifactory REST API
pub struct ArtifactoryClient {
    client: reqwest::Client,
    base_url: String,
    auth: Auth,
}

impl ArtifactoryClient {
    pub fn new(source: &Source) -> Result<Self, RepositoryError> {
        let client = reqwest::Client::builder()
            .user_agent("artifactory-resource")
            .build()?;

        Ok(Self {
            client,
            base_url: source.url.trim_end_matches('/').to_string(),
            auth: Auth::from_source(source),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::None => request,
            Auth::Basic { user, password } => request.basic_auth(user, Some(password)),
            Auth::ApiKey(key) => request.header("X-JFrog-Art-Api", key),
            Auth::Bearer(token) => request.bearer_auth(token),
        }
    }

    async fn upload_file(
        &self,
        spec: &UploadSpec,
        file: PathBuf,
    ) -> Result<String, RepositoryError> {
        let name = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                RepositoryError::InvalidSpec(format!("unsupported file name '{}'", file.display()))
            })?;
        let remote_path = format!("{}{}", spec.target, name);
        let url = self.upload_url(&remote_path, &spec.props)?;

        let local = File::open(&file).await?;
        let length = local.metadata().await?.len();
        let mut request = self
            .authorize(self.client.put(url.clone()))
            .header(CONTENT_LENGTH, length)
            .body(file_body(local));
        if spec.explode_archive {
            request = request.header("X-Explode-Archive", "true");
        }

        let response = request.send().await?;
        ensure_success(response.status(), url.as_str())?;

        debug!("Uploaded '{}' to '{}'", file.display(), remote_path);
        Ok(remote_path)
    }

    /// `{url}/{remote_path};k=v...` with every segment escaped
    fn upload_url(
        &self,
        remote_path: &str,
        props: &IndexMap<String, String>,
    ) -> Result<Url, RepositoryError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            RepositoryError::InvalidSpec(format!("invalid url '{}': {}", self.base_url, e))
        })?;

        let mut path = url.path().trim_end_matches('/').to_string();
        for segment in remote_path.split('/').filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(&escape_segment(segment));
        }
        path.push_str(&matrix_params(props));

        // set_path encodes the remaining reserved characters (`#`, `?`, spaces)
        url.set_path(&path);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Repository for ArtifactoryClient {
    async fn search(&self, spec: &SearchSpec) -> Result<Vec<String>, RepositoryError> {
        let url = format!("{}/api/search/aql", self.base_url);
        let query = aql_query(spec);
        debug!("Searching with {}", query);

        let response = self
            .authorize(self.client.post(&url))
            .header("Content-Type", "text/plain")
            .body(query)
            .send()
            .await?;
        ensure_success(response.status(), &url)?;

        let body: AqlResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse AQL search response: {}", e);
            RepositoryError::InvalidResponse(e.to_string())
        })?;

        let paths: Vec<String> = body
            .results
            .into_iter()
            .filter(|item| spec.matches(&item.relative_path()))
            .map(|item| format!("{}/{}", item.repo, item.relative_path()))
            .collect();

        info!("Found {} file(s) matching '{}/{}'", paths.len(), spec.repo, spec.pattern);
        Ok(paths)
    }

    async fn upload(&self, spec: &UploadSpec) -> Result<UploadSummary, RepositoryError> {
        let files = collect_files(spec)?;
        if files.is_empty() {
            warn!("No local files match '{}'", spec.source);
        }

        let results: Vec<Result<String, RepositoryError>> = stream::iter(files)
            .map(|file| async move {
                let shown = file.display().to_string();
                self.upload_file(spec, file).await.map_err(|e| {
                    warn!("Failed to upload '{}': {}", shown, e);
                    e
                })
            })
            .buffer_unordered(spec.threads.max(1))
            .collect()
            .await;

        let mut summary = UploadSummary::default();
        for result in results {
            match result {
                Ok(path) => {
                    summary.uploaded += 1;
                    summary.uploaded_paths.push(path);
                }
                Err(_) => summary.failed += 1,
            }
        }
        summary.uploaded_paths.sort();

        Ok(summary)
    }
}

/// Build the AQL query selecting candidate files for `spec`
///
/// Only the repository, the literal directory prefix and the properties are
/// pushed to the server; wildcard matching happens client-side.
fn aql_query(spec: &SearchSpec) -> String {
    let mut criteria = Map::new();
    criteria.insert("repo".to_string(), json!(spec.repo));
    criteria.insert("type".to_string(), json!("file"));

    if let Some(dir) = spec.literal_dir() {
        // Wildcards in a directory segment can select files below `dir`
        // even when the search is not recursive
        let below = spec.pattern[dir.len()..].trim_start_matches('/');
        let path = if spec.recursive || below.contains('/') {
            json!({"$or": [{"path": dir}, {"path": {"$match": format!("{}/*", dir)}}]})
        } else {
            json!({"path": dir})
        };
        criteria.insert("$and".to_string(), json!([path]));
    }

    for (key, value) in &spec.props {
        criteria.insert(format!("@{}", key), json!(value));
    }

    format!(
        "items.find({}).include(\"repo\",\"path\",\"name\")",
        Value::Object(criteria)
    )
}

/// `;key=value` matrix parameters attached to upload URLs
fn matrix_params(props: &IndexMap<String, String>) -> String {
    props
        .iter()
        .map(|(key, value)| format!(";{}={}", escape_segment(key), escape_segment(value)))
        .collect()
}

/// Percent-encode the characters `Url::set_path` keeps but Artifactory
/// reads as path or matrix separators
fn escape_segment(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '/' => escaped.push_str("%2F"),
            ';' => escaped.push_str("%3B"),
            '=' => escaped.push_str("%3D"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Stream a local file in fixed-size chunks
fn file_body(file: File) -> Body {
    let chunks = stream::try_unfold(file, |mut file| async move {
        let mut chunk = vec![0u8; UPLOAD_CHUNK_SIZE];
        let read = file.read(&mut chunk).await?;
        if read == 0 {
            return Ok::<_, std::io::Error>(None);
        }
        chunk.truncate(read);
        Ok(Some((chunk, file)))
    });
    Body::wrap_stream(chunks)
}

fn ensure_success(status: StatusCode, url: &str) -> Result<(), RepositoryError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(RepositoryError::Unauthorized(format!("{} returned {}", url, status)));
    }

    if !status.is_success() {
        warn!("Artifactory returned status {}: {}", status, url);
        return Err(RepositoryError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(())
}
