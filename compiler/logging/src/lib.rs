#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging setup for the korpc binary.
//!
//! stdout carries the plugin response, so every log line goes to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "KORPC_LOG";

/// Build the filter: `KORPC_LOG` when set and valid, otherwise `level`.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global stderr subscriber.
///
/// Returns `false` when a subscriber was already installed, which leaves
/// the existing one in place.
pub fn init(level: &str) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::trace!(level, "logging initialized");
    }
    installed
}

/// Map `-v` repetitions onto a level, starting from `base`.
pub fn level_for_verbosity(base: &str, verbose: u8) -> &str {
    match verbose {
        0 => base,
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let first = init("warn");
        assert!(!init("debug"));
        // Another test in this binary may have won the race.
        let _ = first;
    }

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity("warn", 0), "warn");
        assert_eq!(level_for_verbosity("warn", 1), "debug");
        assert_eq!(level_for_verbosity("warn", 4), "trace");
    }
}
