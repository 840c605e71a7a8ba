//! `tracing` subscriber bootstrap.
//!
//! # Invariants
//! - Initialization happens once per process; a second call is an error,
//!   never a panic.
//! - Invalid filter directives are rejected before anything is installed.

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;
use crate::error::ServerError;

/// Installs the global subscriber with the given filter and output format.
pub fn init_logging(filter: &str, format: LogFormat) -> Result<(), ServerError> {
    let filter = build_filter(filter)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| ServerError::Logging(err.to_string()))
}

fn build_filter(directives: &str) -> Result<EnvFilter, ServerError> {
    EnvFilter::try_new(directives).map_err(|err| ServerError::LogFilter {
        filter: directives.to_string(),
        reason: err.to_string(),
    })
}
