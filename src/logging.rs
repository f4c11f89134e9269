//! Log output for resource commands
//!
//! stdout carries the resource protocol, so all log lines go to stderr.
//! The subscriber is installed per command with
//! [`tracing::subscriber::set_default`] rather than as a global default.

use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogLevel;

/// Build a stderr subscriber for `level`.
///
/// `RUST_LOG`, when set to valid directives, takes precedence over the
/// configured level.
pub fn subscriber(level: LogLevel) -> impl Subscriber + Send + Sync {
    let filter = filter_with_env(level, std::env::var("RUST_LOG").ok());

    tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr),
    )
}

fn filter_with_env(level: LogLevel, rust_log: Option<String>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_tracing_level().as_str()))
}
