//! Logging initialization and configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor a configured level is available.
pub const DEFAULT_FILTER: &str = "cz_runner=info";

/// Build a filter from a configured level.
///
/// A bare level such as `debug` is scoped to this crate; anything else is
/// treated as a full `EnvFilter` directive. Invalid input falls back to
/// [`DEFAULT_FILTER`].
pub fn filter_from(level: &str) -> EnvFilter {
    let level = level.trim();
    let lowered = level.to_lowercase();
    let directive = match lowered.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" => format!("cz_runner={}", lowered),
        "" => DEFAULT_FILTER.to_string(),
        _ => level.to_string(),
    };

    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the logging system with an explicit level or directive.
///
/// Logs go to stderr so that command output on stdout stays clean.
pub fn init_with_level(level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter_from(level))
        .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
        .try_init()
}

/// Try to initialize the logging system.
///
/// Returns `Ok(())` if successful, or `Err` if logging has already been
/// initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_idempotent() {
        // First call may or may not succeed depending on test order
        let _ = try_init();
        let _ = try_init();
    }

    #[test]
    fn test_filter_from_bare_level() {
        assert_eq!(filter_from("debug").to_string(), "cz_runner=debug");
        assert_eq!(filter_from(" WARN ").to_string(), "cz_runner=warn");
    }

    #[test]
    fn test_filter_from_directive() {
        assert_eq!(filter_from("cz_runner=trace").to_string(), "cz_runner=trace");
    }

    #[test]
    fn test_filter_from_empty() {
        assert_eq!(filter_from("").to_string(), DEFAULT_FILTER);
    }

    #[test]
    fn test_logging_works() {
        let _ = try_init();

        tracing::info!("test info message");
        tracing::debug!("test debug message");
        tracing::warn!("test warn message");
        tracing::error!("test error message");
    }
}
