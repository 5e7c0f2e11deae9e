//! Diagnostic logging.
//!
//! Library code logs through `tracing` macros; the binary installs a
//! `tracing-subscriber` formatter writing to stderr, so stdout carries only
//! the run summary.
//!
//! Filter priority (highest first):
//! 1. `AUTOINDEX_LOG` (any `EnvFilter` directive, e.g. `autoindex=debug`)
//! 2. `-v` count: none = warn, `-v` = info, `-vv` = debug, `-vvv` = trace

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "AUTOINDEX_LOG";

/// Default level for a `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
