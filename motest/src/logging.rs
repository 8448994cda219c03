//! Development-time tracing for debugging the orchestrator.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: Diagnostics via `RUST_LOG`, output to stderr.
//!   Decisions, child processes and cache activity are traced here.
//!
//! - **Product output (`main`)**: Compile notices, test output and the summary
//!   go to stdout and are unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset; `verbose` raises the
/// default to `motest=debug`.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=motest=trace motest test
/// ```
pub fn init(verbose: bool) {
    let fallback = if verbose { "warn,motest=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
