//! Version range expressions
//!
//! Supports the comparator syntax accepted in a resource's `version` field:
//! - `1.2.3`, `=1.2.3`, `==1.2.3` - exact match
//! - `!=1.2.3` - anything but
//! - `>1.2.3`, `>=1.2.3`, `<1.2.3`, `<=1.2.3` - comparison operators
//! - `>=1.0.0 <2.0.0`, `>=1.0.0 && <2.0.0` - AND (all must satisfy)
//! - `<1.0.0 || >=2.0.0` - OR (any must satisfy)
//!
//! Comparisons follow semantic-version precedence, so build metadata never
//! influences the result.

use std::cmp::Ordering;
use std::fmt;

use semver::Version;

use crate::version::error::RangeError;
use crate::version::extractor::VersionedFile;
use crate::version::semver::{cmp_precedence, sanitize_version};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    /// Split a leading operator from a comparator token
    fn split(token: &str) -> (Self, &str) {
        // Two-character operators must be tried first
        const OPERATORS: &[(&str, Operator)] = &[
            (">=", Operator::Gte),
            ("<=", Operator::Lte),
            ("==", Operator::Eq),
            ("!=", Operator::Ne),
            (">", Operator::Gt),
            ("<", Operator::Lt),
            ("=", Operator::Eq),
        ];

        OPERATORS
            .iter()
            .find_map(|(prefix, op)| token.strip_prefix(prefix).map(|rest| (*op, rest)))
            .unwrap_or((Operator::Eq, token))
    }

    fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Operator,
    version: Version,
}

impl Comparator {
    fn satisfies(&self, version: &Version) -> bool {
        let ord = cmp_precedence(version, &self.version);
        match self.op {
            Operator::Eq => ord == Ordering::Equal,
            Operator::Ne => ord != Ordering::Equal,
            Operator::Gt => ord == Ordering::Greater,
            Operator::Gte => ord != Ordering::Less,
            Operator::Lt => ord == Ordering::Less,
            Operator::Lte => ord != Ordering::Greater,
        }
    }
}

/// A predicate over semantic versions.
///
/// Internally an OR of AND-composed comparator sets; a version satisfies the
/// range if it satisfies every comparator of at least one set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    sets: Vec<Vec<Comparator>>,
    expression: String,
}

impl VersionRange {
    /// Parse a range expression exactly as written (no sanitizing).
    pub fn parse(expression: &str) -> Result<Self, RangeError> {
        let invalid = |reason: String| RangeError::InvalidRangeExpression {
            expression: expression.to_string(),
            reason,
        };

        if expression.trim().is_empty() {
            return Err(invalid("empty expression".to_string()));
        }

        let sets = expression
            .split("||")
            .map(|set| Self::parse_set(set).map_err(&invalid))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sets,
            expression: expression.trim().to_string(),
        })
    }

    /// Parse one AND set: comparators separated by whitespace or `&&`
    fn parse_set(set: &str) -> Result<Vec<Comparator>, String> {
        let mut comparators = Vec::new();
        let mut pending_op: Option<&str> = None;

        for token in set.split_whitespace().flat_map(|t| t.split("&&")) {
            if token.is_empty() {
                continue;
            }

            // An operator separated from its version by whitespace: ">= 1.2.3"
            if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '!')) {
                if pending_op.is_some() {
                    return Err(format!("unexpected operator '{}'", token));
                }
                pending_op = Some(token);
                continue;
            }

            let joined;
            let token = match pending_op.take() {
                Some(op) => {
                    joined = format!("{}{}", op, token);
                    joined.as_str()
                }
                None => token,
            };

            let (op, version) = Operator::split(token);
            let version = Version::parse(version)
                .map_err(|e| format!("invalid version in '{}': {}", token, e))?;
            comparators.push(Comparator { op, version });
        }

        if let Some(op) = pending_op {
            return Err(format!("operator '{}' has no version", op));
        }
        if comparators.is_empty() {
            return Err("empty range set".to_string());
        }

        Ok(comparators)
    }

    /// A range matching only versions strictly greater than `version`.
    pub fn greater_than(version: &Version) -> Self {
        Self {
            sets: vec![vec![Comparator {
                op: Operator::Gt,
                version: version.clone(),
            }]],
            expression: format!("{}{}", Operator::Gt.as_str(), version),
        }
    }

    /// Conjunction of two ranges.
    ///
    /// AND distributes over the OR sets of both sides.
    pub fn and(self, other: VersionRange) -> Self {
        let mut sets = Vec::with_capacity(self.sets.len() * other.sets.len());
        for lhs in &self.sets {
            for rhs in &other.sets {
                sets.push(lhs.iter().chain(rhs).cloned().collect());
            }
        }

        Self {
            sets,
            expression: format!("{} && {}", self.expression, other.expression),
        }
    }

    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets
            .iter()
            .any(|set| set.iter().all(|c| c.satisfies(version)))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Build the composite range for a discovery run.
///
/// The configured expression is sanitized and parsed; when a previous version
/// is known, the result is further restricted to versions strictly above it.
pub fn build_range(
    configured: &str,
    previous: Option<&VersionedFile>,
) -> Result<VersionRange, RangeError> {
    let range = VersionRange::parse(&sanitize_version(configured)).map_err(|e| match e {
        RangeError::InvalidRangeExpression { reason, .. } => RangeError::InvalidRangeExpression {
            expression: configured.to_string(),
            reason,
        },
    })?;

    Ok(match previous {
        Some(previous) => range.and(VersionRange::greater_than(&previous.version)),
        None => range,
    })
}
