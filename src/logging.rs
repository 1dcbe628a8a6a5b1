//! Diagnostic logging setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a stderr subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG` the level is `warn`, or `debug` when `verbose` is set,
/// so log lines stay out of the way of prompts on stdout.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default_level = if verbose { "debug" } else { "warn" };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
