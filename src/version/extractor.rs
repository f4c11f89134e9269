//! Semantic version extraction from repository file paths
//!
//! A path such as `libs/release/app-v1.4.2-rc.1.tar.gz` is reduced to its
//! basename, its final extension is dropped, and the first version-looking
//! fragment wins. Partial fragments (`app_2.zip`) are padded before parsing.
//!
//! Since a single number is a valid fragment, digits inside a name are
//! picked up before a later version: `log4j-1.2.17.jar` is `4.0.0`, and
//! `s3-uploader-1.4.0.zip` captures `3-uploader-1.4.0`, which does not parse,
//! so the file is reported as invalid rather than read as `1.4.0`.

use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

use crate::version::error::ExtractError;
use crate::version::semver::sanitize_version;

/// Optional marker (`v`, `-`, `_`, then another optional `v`), one to three
/// numeric components, then optional pre-release and build metadata.
static SEMVER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:v|-|_)?v?((?:0|[1-9]\d*)(?:\.(?:0|[1-9]\d*)){0,2}(?:-[\da-z\-]+(?:\.[\da-z\-]+)*)?(?:\+[\da-z\-]+(?:\.[\da-z\-]+)*)?)",
    )
    .expect("semver pattern is valid")
});

/// A discovered artifact whose path carries a valid semantic version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedFile {
    pub path: String,
    pub version: Version,
}

/// Extract the semantic version encoded in `path`.
///
/// Returns `Ok(None)` for an empty path, which callers use to mean
/// "no previous version".
pub fn extract(path: &str) -> Result<Option<VersionedFile>, ExtractError> {
    if path.is_empty() {
        return Ok(None);
    }

    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = strip_extension(file_name);

    let raw = SEMVER_PATTERN
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .ok_or(ExtractError::NoVersionFound)?;

    let sanitized = sanitize_version(raw);
    let version = Version::parse(&sanitized).map_err(|source| ExtractError::InvalidSemver {
        version: sanitized.clone(),
        source,
    })?;

    Ok(Some(VersionedFile {
        path: path.to_string(),
        version,
    }))
}

/// Drop the final `.suffix` when it looks like a file extension.
///
/// A purely numeric suffix is a version component, not an extension, so
/// `app-1.2.3` is left untouched.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => {
            let ext = &file_name[idx + 1..];
            if ext.is_empty() || ext.chars().all(|c| c.is_ascii_digit()) {
                file_name
            } else {
                &file_name[..idx]
            }
        }
        _ => file_name,
    }
}
