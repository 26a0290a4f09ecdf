use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// Level comes from `RUST_LOG`, defaulting to `info`. Records emitted through
/// the `log` facade (actix's access logger) are forwarded as well.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
