//! Structured logging setup using **tracing**.
//!
//! The JSON subscriber writes machine-readable events to stderr, keeping
//! stdout clean for report output.

/// Initializes the global tracing collector (subscriber).
///
/// Call once at the beginning of the application's runtime.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=tablecheck=debug`)
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
