//! Tracing setup
//!
//! Logs go to stderr so `parse` output on stdout stays machine-readable.
//! Filtering follows `RUST_LOG` and defaults to `info`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Switch to JSON log lines when set to a true value
pub const ENV_LOG_JSON: &str = "TRACKSYNC_LOG_JSON";

/// Read a boolean flag from the environment
#[must_use]
pub fn env_bool(name: &str, default: bool) -> bool {
    parse_bool(std::env::var(name).ok().as_deref()).unwrap_or(default)
}

fn parse_bool(value: Option<&str>) -> Option<bool> {
    match value? {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

/// Install the global subscriber
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_spellings() {
        assert_eq!(parse_bool(Some("1")), Some(true));
        assert_eq!(parse_bool(Some("YES")), Some(true));
        assert_eq!(parse_bool(Some("false")), Some(false));
        assert_eq!(parse_bool(Some("maybe")), None);
        assert_eq!(parse_bool(None), None);
    }

    #[test]
    fn unset_variable_uses_default() {
        assert!(env_bool("TRACKSYNC_TEST_SURELY_UNSET_FLAG", true));
    }
}
