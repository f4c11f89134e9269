use thiserror::Error;

/// Why a version could not be extracted from a file path.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Cannot find any semver in file")]
    NoVersionFound,

    #[error("Invalid semver '{version}': {source}")]
    InvalidSemver {
        version: String,
        #[source]
        source: semver::Error,
    },
}

#[derive(Debug, Error)]
pub enum RangeError {
    #[error("Error when trying to create semver range '{expression}': {reason}")]
    InvalidRangeExpression { expression: String, reason: String },
}
