//! `check`: discover versions available in the repository

use tracing::{info, warn};

use crate::error::ResourceError;
use crate::repository::{Repository, SearchSpec};
use crate::resource::{CheckRequest, Version};
use crate::version::error::RangeError;
use crate::version::{DiscoveryMode, build_range, extract, rank};

/// Search the repository and return the versions to report, oldest first.
pub async fn check<R>(
    repository: &R,
    request: &CheckRequest,
) -> Result<Vec<Version>, ResourceError>
where
    R: Repository + ?Sized,
{
    let source = &request.source;
    source.validate()?;

    let spec = SearchSpec::from_source(source)?;
    let candidates = repository.search(&spec).await?;

    let paths = discover(&candidates, &source.version, request.previous_path())?;
    info!("Reporting {} version(s)", paths.len());

    Ok(paths.into_iter().map(Version::new).collect())
}

/// Turn search results into the ordered list of version paths.
///
/// An empty `configured` constraint selects unversioned mode. A previous
/// path with no usable version is treated as absent.
pub fn discover(
    candidates: &[String],
    configured: &str,
    previous_path: &str,
) -> Result<Vec<String>, RangeError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let configured = configured.trim();
    if configured.is_empty() {
        return Ok(rank(candidates, DiscoveryMode::Unversioned));
    }

    let previous = extract(previous_path).unwrap_or_else(|e| {
        warn!("Ignoring previous version '{}': {}", previous_path, e);
        None
    });

    let range = build_range(configured, previous.as_ref())?;
    info!("Selecting versions matching '{}'", range);

    Ok(rank(
        candidates,
        DiscoveryMode::Versioned {
            range: &range,
            previous: previous.as_ref(),
        },
    ))
}
