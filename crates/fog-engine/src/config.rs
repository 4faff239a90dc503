//! Engine-wide configuration, built once and shared read-only by the
//! front-end and every worker (`spec.md` §4.7.1, §6 "Thread inputs").

use std::sync::Arc;

use fog_raster::Precision;

/// A process-wide (or caller-supplied) thread pool the engine borrows its
/// long-lived workers from, per `spec.md` §6 "Thread inputs".
pub trait ThreadPool: Send + Sync {
    /// Spawns `f` as a long-lived worker; the engine calls this once per
    /// worker at startup and expects the thread to run until dropped.
    fn spawn(&self, f: Box<dyn FnOnce() + Send + 'static>);
}

/// A [`ThreadPool`] backed by plain `std::thread` spawns, used when the
/// caller does not supply one of its own.
#[derive(Debug, Default)]
pub struct StdThreadPool;

impl ThreadPool for StdThreadPool {
    fn spawn(&self, f: Box<dyn FnOnce() + Send + 'static>) {
        std::thread::spawn(f);
    }
}

/// Engine-wide configuration. Built via [`bon`]'s generated builder so
/// callers only set the fields they care about.
#[derive(bon::Builder)]
pub struct EngineConfig {
    /// Number of long-lived worker threads, `N` in `spec.md` §4.7's
    /// `(offset=i, delta=N)` band partitioning. Default: `min(available
    /// parallelism, 4)`.
    #[builder(default = default_worker_count())]
    pub worker_count: usize,

    /// Thread pool workers are spawned from. Default: [`StdThreadPool`].
    #[builder(default = Arc::new(StdThreadPool))]
    pub thread_pool: Arc<dyn ThreadPool>,

    /// Soft cap (in bytes) on the per-frame command zone before a
    /// `fillPath`-style call blocks waiting for workers to drain
    /// (`spec.md` §4.7 suspension point (c)).
    #[builder(default = 16 * 1024 * 1024)]
    pub command_zone_soft_cap: usize,

    /// Fixed-point precision the rasterizer uses for this engine's
    /// lifetime (`spec.md` §4.3, "two coordinate precisions").
    #[builder(default = Precision::Precision24x8)]
    pub rasterizer_precision: Precision,
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism().map(std::num::NonZeroUsize::get).unwrap_or(1).min(4)
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("worker_count", &self.worker_count)
            .field("command_zone_soft_cap", &self.command_zone_soft_cap)
            .field("rasterizer_precision", &self.rasterizer_precision)
            .finish_non_exhaustive()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_caps_worker_count_at_four() {
        let cfg = EngineConfig::default();
        assert!(cfg.worker_count >= 1 && cfg.worker_count <= 4);
    }

    #[test]
    fn builder_overrides_individual_fields() {
        let cfg = EngineConfig::builder().worker_count(2).command_zone_soft_cap(1024).build();
        assert_eq!(cfg.worker_count, 2);
        assert_eq!(cfg.command_zone_soft_cap, 1024);
    }
}
