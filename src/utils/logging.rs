use std::sync::OnceLock;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Install the global fmt subscriber once. Honors `RUST_LOG`, falls back to `info`.
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}
