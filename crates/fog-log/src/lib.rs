//! Tracing setup for the engine. Hot paths (per-span rasterization,
//! per-pixel kernels) log at `trace` so they compile out at default levels;
//! engine lifecycle events (flush, worker spawn/shutdown, LUT eviction,
//! latched errors) log at `debug`/`warn`.
//!
//! With the `pretty` feature, [`init`] installs a `tracing-forest` layer
//! (hierarchical span tree) instead of the flat `fmt` layer — useful for
//! following a single frame's worker fan-out during development.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// The environment variable `init` reads to pick the log level, falling
/// back to `info` when unset or unparseable.
pub const FILTER_ENV_VAR: &str = "FOG_LOG";

/// Installs a process-global `tracing` subscriber. Safe to call more than
/// once; later calls are no-ops (tracing only allows one global default).
pub fn init() {
    let filter = EnvFilter::try_from_env(FILTER_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(feature = "pretty")]
    {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_forest::ForestLayer::default())
            .try_init();
    }

    #[cfg(not(feature = "pretty"))]
    {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_does_not_panic_when_called_twice() {
        init();
        init();
    }
}
