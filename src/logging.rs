//! Logging setup.
//!
//! Components log through the `log` facade. [`init`] installs `env_logger` as
//! the sink; `RUST_LOG` takes precedence over the configured level.

use crate::config::LogLevel;

/// Installs the logger at the given level.
///
/// Safe to call more than once; only the first call installs the sink, later
/// calls just adjust the maximum level.
pub fn init(level: LogLevel) {
    let env = env_logger::Env::default().default_filter_or(level.as_str());
    let installed = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_ok();

    if !installed {
        apply_level(level);
    }
}

/// Changes the maximum level of emitted records.
pub fn apply_level(level: LogLevel) {
    log::set_max_level(level.as_filter());
}
