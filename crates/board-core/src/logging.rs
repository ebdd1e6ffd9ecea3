//! Logging setup.
//!
//! Library code only emits `tracing` events. Native binaries and tests
//! install a fmt subscriber filtered by `CAVERNA_LOG`.

pub const LOG_ENV: &str = "CAVERNA_LOG";

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("board_core=info,warn"));
    // A second init (e.g. across tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init_logging() {}
