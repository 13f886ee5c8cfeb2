//! Stderr log output for the binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Maps the `-v` count to a default filter directive.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the global subscriber. `RUST_LOG` wins over `-v`.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init(verbosity: u8) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(level_for(verbosity)))
        .with(layer)
        .try_init();
}
