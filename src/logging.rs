//! Process-level tracing setup for the chroniq binary.

use std::sync::OnceLock;

static INIT: OnceLock<()> = OnceLock::new();

/// Environment variable selecting the log level
pub const LOG_ENV: &str = "CHRONIQ_LOG";

fn parse_level(raw: Option<&str>, verbose: bool) -> tracing::Level {
    if verbose {
        return tracing::Level::DEBUG;
    }
    match raw.unwrap_or("warn").to_ascii_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    }
}

/// Initialize stderr logging from `CHRONIQ_LOG` (default `warn`).
///
/// `verbose` forces debug level. Only the first call has any effect.
pub fn init(verbose: bool) {
    if INIT.get().is_some() {
        return;
    }
    let level = parse_level(std::env::var(LOG_ENV).ok().as_deref(), verbose);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
    let _ = INIT.set(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(None, false), tracing::Level::WARN);
        assert_eq!(parse_level(Some("DEBUG"), false), tracing::Level::DEBUG);
        assert_eq!(parse_level(Some("bogus"), false), tracing::Level::WARN);
        assert_eq!(parse_level(Some("error"), true), tracing::Level::DEBUG);
    }
}
