//! Tracing setup for the `onair` binary
//!
//! Log lines go to stderr so stdout carries only command output.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Level named by `--log-level` or the config, INFO when missing or invalid
fn resolve_level(log_level: Option<&str>) -> Level {
    log_level
        .and_then(|s| s.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

/// Install the global subscriber. Call once, before any command runs.
pub fn init_logging(log_level: Option<&str>) {
    FmtSubscriber::builder()
        .with_target(false)
        .with_max_level(resolve_level(log_level))
        .with_writer(std::io::stderr)
        .init();
}
