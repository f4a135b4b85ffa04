//! Diagnostic logging setup
//!
//! Events go to stderr so generated summaries on stdout stay clean.
//! `RUST_LOG` takes precedence over the command line verbosity.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "rpa_speckit=debug,info";

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_FILTER
        } else {
            DEFAULT_FILTER
        })
    })
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter(verbose))
        .try_init();
}
