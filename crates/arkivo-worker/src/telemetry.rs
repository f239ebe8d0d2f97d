use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for worker processes.
///
/// Honors `RUST_LOG`; defaults to `arkivo=info` when unset or invalid.
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "arkivo=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
