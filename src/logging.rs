// src/logging.rs
// =============================================================================
// Diagnostic logging setup.
//
// The engine emits `tracing` events at debug/trace level (documents parsed,
// probes finished, links excluded). Results are NOT logged; they are
// printed by main.rs. Logs go to stderr so they never mix with the JSON
// report on stdout.
//
// RUST_LOG always wins, e.g. RUST_LOG=linkwatch=trace.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `verbose` turns on debug output for
/// this crate when RUST_LOG is not set.
pub fn init(verbose: bool) -> Result<()> {
    let default_directive = if verbose { "warn,linkwatch=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
