//! Concourse resource for versioned artifacts stored in Artifactory.
//!
//! - [`check`]: finds artifacts and reports their paths ordered by semantic version
//! - [`out`]: uploads local files and reports upload statistics
//! - [`version`]: the pure version-discovery core (extract, range, rank)
//! - [`repository`]: the Artifactory collaborator behind a mockable trait

pub mod check;
pub mod config;
pub mod error;
pub mod logging;
pub mod out;
pub mod repository;
pub mod resource;
pub mod version;
