//! Logging setup for the dbredact binary.

use crate::Result;

/// Initializes structured logging for one export run.
///
/// # Arguments
/// * `verbose` - Verbosity level (0=INFO, 1=DEBUG, 2+=TRACE)
/// * `quiet` - If true, only show ERROR level logs
///
/// # Errors
/// Returns `ExportError::Config` if a global subscriber is already set.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose, quiet))
        .with_target(false)
        .try_init()
        .map_err(|e| {
            crate::error::ExportError::config(format!("Failed to initialize logging: {e}"))
        })
}

/// Maps the CLI verbosity flags to a log level. `quiet` wins over any
/// number of `-v` flags.
fn log_level(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}
