//! `tracing` subscriber setup.
//!
//! Logs go to stderr so stdout stays clean for JSON output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "ATMGEN_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from `directive`, falling back to `warn` when absent or invalid.
#[must_use]
pub fn filter_from(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let directive = std::env::var(LOG_ENV).ok();
    let _ = tracing_subscriber::registry()
        .with(filter_from(directive.as_deref()))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_warn() {
        assert_eq!(filter_from(None).to_string(), "warn");
    }

    #[test]
    fn accepts_module_directives() {
        assert_eq!(filter_from(Some("atmgen=debug")).to_string(), "atmgen=debug");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init();
        init();
    }
}
