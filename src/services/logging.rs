//! Tracing subscriber setup.
//!
//! One subscriber for the whole process: an [EnvFilter] (honouring `RUST_LOG`)
//! plus either the JSON formatter or a human-readable one, picked by
//! [LogFormat] from the config.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, LogFormat};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "librarian_decisions=info";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global subscriber. Safe to call more than once; later calls are
/// ignored.
pub fn init_tracing(config: &Config) {
    let registry = tracing_subscriber::registry().with(env_filter());

    let result = match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
