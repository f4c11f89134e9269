//! Version discovery core
//!
//! Pure, synchronous logic that turns repository paths into an ordered list
//! of versions. Nothing in here performs I/O.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Extractor  │────▶│   Ranker    │◀────│    Range    │
//! │ (path→ver)  │     │(filter/sort)│     │ (predicate) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────────────────────────────────────────────┐
//! │              Semver (sanitize, precedence)          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`extractor`]: Finds the semantic version in a file path
//! - [`range`]: Range expressions and the composite discovery range
//! - [`ranker`]: Filters candidates by range and orders them by version
//! - [`semver`]: Partial version padding and precedence comparison
//! - [`error`]: Extraction and range errors

pub mod error;
pub mod extractor;
pub mod range;
pub mod ranker;
pub mod semver;

pub use error::{ExtractError, RangeError};
pub use extractor::{VersionedFile, extract};
pub use range::{VersionRange, build_range};
pub use ranker::{DiscoveryMode, rank};
pub use semver::sanitize_version;
