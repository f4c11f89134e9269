use std::cmp::Ordering;

use semver::Version;

/// Pad a partial version string to a full `major.minor.patch` triplet.
///
/// Only the number of dot-separated components is inspected, so any
/// pre-release or build suffix attached to the last component is kept as-is.
///
/// Examples:
/// - "1" -> "1.0.0"
/// - "1.2" -> "1.2.0"
/// - "1.2.3-rc1" -> "1.2.3-rc1"
pub fn sanitize_version(version: &str) -> String {
    match version.split('.').count() {
        1 => format!("{}.0.0", version),
        2 => format!("{}.0", version),
        _ => version.to_string(),
    }
}

/// Compare two versions by semantic-version precedence.
///
/// Unlike `Ord for semver::Version`, build metadata is ignored entirely:
/// `1.0.0+a` and `1.0.0+b` have equal precedence.
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}
