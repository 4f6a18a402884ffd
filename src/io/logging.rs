//! Logger initialisation for the command-line binary

use flexi_logger::{Logger, LoggerHandle};

use crate::io::configuration::DEFAULT_LOG_LEVEL;
use crate::io::error::{BlendError, Result};

/// Pick the log level for the given verbosity flags
///
/// `quiet` wins over `verbose`.
pub const fn log_level(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        DEFAULT_LOG_LEVEL
    }
}

/// Start logging to stderr
///
/// `RUST_LOG` takes precedence over `level` when set. Keep the returned
/// handle alive for as long as logging is needed.
///
/// # Errors
///
/// Returns an error if the level specification is invalid or a logger is
/// already installed
pub fn init_logging(level: &str) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(level)
        .map_err(|e| BlendError::Logging {
            reason: e.to_string(),
        })?
        .log_to_stderr()
        .start()
        .map_err(|e| BlendError::Logging {
            reason: e.to_string(),
        })
}
