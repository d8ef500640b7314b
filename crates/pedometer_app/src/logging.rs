//! Log setup for the binary.

use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_VAR: &str = "PEDOMETER_LOG_LEVEL";
const DEFAULT_FILTER: &str = "info";

/// `PEDOMETER_LOG_LEVEL`, else `RUST_LOG`, else `info`.
pub fn log_directive_with<F>(mut get: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    get(LOG_LEVEL_VAR)
        .or_else(|| get("RUST_LOG"))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Build the filter, falling back to `info` when the directive does not
/// parse.
pub fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Compact, uncolored output on stderr so stdout stays free for views.
pub fn init() -> String {
    let directive = log_directive_with(|key| std::env::var(key).ok());
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter(&directive))
        .init();
    directive
}
