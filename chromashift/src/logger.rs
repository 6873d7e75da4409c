// chromashift/src/logger.rs
//! Logger setup for the chromashift binary.
//!
//! Diagnostics go to stderr so they never mix with the colorized output of
//! the wrapped command on stdout. `RUST_LOG` is honoured; an explicit level
//! (from `--debug`) overrides it.
//!
//! License: MIT OR APACHE 2.0

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Default filter when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Installs the global logger. Calling it more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(Target::Stderr);

    // A logger may already be installed (tests).
    let _ = builder.try_init();
}
