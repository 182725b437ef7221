//! Subscriber setup for the CLI

use tracing_subscriber::EnvFilter;

/// Filter directive for the configured level; `-v` forces debug
pub fn directive(log_level: &str, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        log_level.to_string()
    }
}

/// Install a fmt subscriber writing to stderr
///
/// `RUST_LOG` wins over both the configured level and `-v`.
pub fn init(log_level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(log_level, verbose)));

    // Ignore the error if a subscriber is already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
