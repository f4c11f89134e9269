//! Local file selection for uploads

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::repository::RepositoryError;
use crate::repository::spec::{UploadSpec, compile_pattern};

// '.' counts as a literal when locating the base directory
const REGEX_META: &[char] = &['*', '+', '?', '(', ')', '[', ']', '{', '}', '|', '^', '$', '\\'];

/// Collect the local files selected by `spec.source`, sorted by path.
///
/// A plain file selects itself, a directory selects everything below it,
/// and a pattern selects every file below its literal directory prefix that
/// matches the pattern.
pub fn collect_files(spec: &UploadSpec) -> Result<Vec<PathBuf>, RepositoryError> {
    let source = spec.source.as_str();
    let wildcards: &[char] = if spec.regexp { REGEX_META } else { &['*', '?'] };

    let mut files = match source.find(wildcards) {
        None => {
            let path = Path::new(source);
            if path.is_file() {
                vec![path.to_path_buf()]
            } else if path.is_dir() {
                walk_files(path, |_| true)?
            } else {
                Vec::new()
            }
        }
        Some(first_special) => {
            let base = match source[..first_special].rfind('/') {
                Some(0) => "/",
                Some(idx) => &source[..idx],
                None => ".",
            };
            let matcher = compile_pattern(source, true, spec.regexp)?;
            debug!("Matching local files below '{}' against '{}'", base, source);
            walk_files(Path::new(base), |path| {
                path.to_str().is_some_and(|p| matcher.is_match(p))
            })?
        }
    };

    files.sort();
    Ok(files)
}

fn walk_files(
    base: &Path,
    selected: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, RepositoryError> {
    if !base.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(base).follow_links(true) {
        let entry = entry.map_err(|e| {
            RepositoryError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("file system loop detected")),
            )
        })?;
        if entry.file_type().is_file() && selected(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
