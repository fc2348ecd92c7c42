use std::io::{self, IsTerminal};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. Everything goes to stderr so that stdout
/// stays reserved for `--format json` responses.
///
/// `RUST_LOG` wins over the default level unless `verbose` is set.
pub fn setup_logging(verbose: bool, json_format: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if json_format {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(io::stderr().is_terminal())
                    .with_writer(io::stderr),
            )
            .with(env_filter)
            .init();
    }
}
