//! Candidate filtering and ordering
//!
//! Turns the raw list of paths returned by a repository search into the
//! ordered list of versions handed back to the pipeline.

use tracing::{info, warn};

use crate::version::extractor::{VersionedFile, extract};
use crate::version::range::VersionRange;
use crate::version::semver::cmp_precedence;

/// How candidates are selected and ordered, chosen once per discovery run
#[derive(Debug, Clone, Copy)]
pub enum DiscoveryMode<'a> {
    /// No version constraint configured: candidates pass through untouched
    Unversioned,
    /// Candidates are filtered by the range and sorted by version, after the
    /// previous version (if any)
    Versioned {
        range: &'a VersionRange,
        previous: Option<&'a VersionedFile>,
    },
}

/// Filter and order candidate paths.
///
/// In versioned mode the previous version's path always comes first, even if
/// it no longer satisfies `range`. Candidates without a usable version are
/// logged and skipped. Paths resolving to the same version precedence are
/// ordered lexicographically.
pub fn rank(candidates: &[String], mode: DiscoveryMode<'_>) -> Vec<String> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let (range, previous) = match mode {
        DiscoveryMode::Unversioned => return candidates.to_vec(),
        DiscoveryMode::Versioned { range, previous } => (range, previous),
    };

    let mut files: Vec<VersionedFile> = candidates
        .iter()
        .filter_map(|path| match extract(path) {
            Ok(Some(file)) => Some(file),
            Ok(None) => None,
            Err(e) => {
                warn!("Error for file '{}': {}", path, e);
                None
            }
        })
        .filter(|file| {
            if range.satisfies(&file.version) {
                info!(
                    "Found valid file '{}' in version '{}'",
                    file.path, file.version
                );
                true
            } else {
                info!(
                    "Skipping file '{}' with version '{}' because it doesn't satisfy range '{}'",
                    file.path, file.version, range
                );
                false
            }
        })
        .collect();

    files.sort_by(|a, b| {
        cmp_precedence(&a.version, &b.version).then_with(|| a.path.cmp(&b.path))
    });

    previous
        .map(|previous| previous.path.clone())
        .into_iter()
        .chain(files.into_iter().map(|file| file.path))
        .collect()
}
