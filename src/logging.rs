//! Logging setup. Stdout-only structured logs via `tracing-subscriber`'s `EnvFilter`;
//! telemetry export is out of scope so there is no OpenTelemetry layer here.

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. Honors `RUST_LOG`, defaulting to `info` for this
/// crate and `warn` for its dependencies.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,gcp_project_reaper=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
