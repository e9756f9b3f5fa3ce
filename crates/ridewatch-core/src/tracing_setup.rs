//! Tracing subscriber setup.

use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "RIDEWATCH_LOG";

static INIT: Once = Once::new();

/// Install a global `fmt` subscriber filtered by `RIDEWATCH_LOG`, then
/// `RUST_LOG`, then `default_filter`. Later calls are no-ops, and an
/// already-installed global subscriber is left in place.
pub fn init_tracing(default_filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init();
    });
}
