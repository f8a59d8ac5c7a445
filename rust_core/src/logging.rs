//! Tracing setup for applications embedding the client.

use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Default level when none (or an unknown one) is given
pub const DEFAULT_LEVEL: &str = "warn";

/// Map a level name to a tracing filter directive. Accepts the usual
/// spellings, including `WARNING` and `CRITICAL`.
pub fn parse_level(level: &str) -> Option<&'static str> {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => Some("trace"),
        "DEBUG" => Some("debug"),
        "INFO" => Some("info"),
        "WARN" | "WARNING" => Some("warn"),
        "ERROR" | "CRITICAL" => Some("error"),
        _ => None,
    }
}

/// Install a global fmt subscriber. `RUST_LOG` wins over `level`.
/// Calling this again after a subscriber is installed is a no-op.
pub fn init(level: &str) {
    let directive = parse_level(level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive.unwrap_or(DEFAULT_LEVEL)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed && directive.is_none() {
        warn!("Logging level {} not recognized, using {}", level, DEFAULT_LEVEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("WARNING"), Some("warn"));
        assert_eq!(parse_level("critical"), Some("error"));
        assert_eq!(parse_level(" Debug "), Some("debug"));
        assert_eq!(parse_level("verbose"), None);
    }

    #[test]
    fn test_init_twice() {
        init("info");
        init("nonsense");
    }
}
