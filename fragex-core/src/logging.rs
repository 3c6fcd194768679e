//! Structured logging setup using **tracing**.
//!
//! Events go to stderr so stdout stays clean for reports and rendered
//! fragments. Filtering is controlled through `RUST_LOG`
//! (e.g. `RUST_LOG=fragex=trace` to see per-statement decisions).

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing collector (subscriber).
///
/// Call once at the beginning of the application's runtime. With `json`
/// set, events are emitted as JSON records for machine consumption;
/// otherwise as human-readable lines.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::from_default_env();
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_level(true)
            .with_target(true)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_level(true)
            .with_target(true)
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
