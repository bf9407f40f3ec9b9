//! Logging setup for the provider process.
//!
//! Lifecycle calls emit `tracing` events tagged with the resource type and
//! identity. These helpers install a subscriber that writes them to
//! **stderr**, leaving stdout to the orchestrator's plugin channel.
//!
//! # Quick Start
//!
//! ```
//! use dbsnapper_provider::{try_init_logging, DbSnapperProvider};
//!
//! try_init_logging();
//! tracing::info!("DBSnapper provider starting");
//! let provider = DbSnapperProvider::new(env!("CARGO_PKG_VERSION"));
//! # let _ = provider;
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls log levels (e.g., `info`, `debug`, `dbsnapper_provider=debug`)
//!
//! Without `RUST_LOG`, the level passed to [`init_logging_with_default`]
//! applies. To show API request/response status lines by default:
//!
//! ```no_run
//! dbsnapper_provider::init_logging_with_default("dbsnapper_provider::client=debug");
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

/// Initialize the default logging subscriber.
///
/// Writes to stderr, respects `RUST_LOG`, and defaults to `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging with a custom default level, used when `RUST_LOG` is
/// not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning false if a subscriber was already set.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be set once per process, so only the
    // idempotent entry point is exercised here.

    use super::*;

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("dbsnapper_provider=debug").is_ok());
        assert!(EnvFilter::try_new("warn,dbsnapper_provider::resources=debug").is_ok());
    }

    #[test]
    fn test_try_init_logging_is_repeatable() {
        let _ = try_init_logging();
        assert!(!try_init_logging());
    }
}
