//! Opt-in wall-clock timing.
//!
//! Off unless the `IK_TIMING` environment variable is set or
//! [`enable_timing`] has been called. Reports go through `tracing`.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

static FORCED: AtomicBool = AtomicBool::new(false);
static FROM_ENV: OnceLock<bool> = OnceLock::new();

pub fn enable_timing() {
    FORCED.store(true, Ordering::Relaxed);
}

pub fn disable_timing() {
    FORCED.store(false, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    FORCED.load(Ordering::Relaxed)
        || *FROM_ENV.get_or_init(|| std::env::var_os("IK_TIMING").is_some())
}

/// Measures one labelled span, e.g. loading a reaction file.
pub struct Timer {
    label: &'static str,
    started: Option<Instant>,
}

impl Timer {
    /// Starts only when timing is enabled; otherwise every method is a no-op.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            started: is_enabled().then(Instant::now),
        }
    }

    /// Elapsed seconds, or `None` when timing was off at start.
    pub fn stop(self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    pub fn stop_and_log(self) -> Option<f64> {
        let label = self.label;
        let elapsed_s = self.stop()?;
        tracing::info!(label, elapsed_s, "timing");
        Some(elapsed_s)
    }
}

/// Lock-free statistics over many short calls, shareable across threads.
pub struct AccumulatingTimer {
    total_ns: AtomicU64,
    max_ns: AtomicU64,
    count: AtomicU64,
}

impl Default for AccumulatingTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl AccumulatingTimer {
    pub const fn new() -> Self {
        Self {
            total_ns: AtomicU64::new(0),
            max_ns: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Run `f`, recording its duration when timing is enabled.
    pub fn time<T>(&self, f: impl FnOnce() -> T) -> T {
        if !is_enabled() {
            return f();
        }
        let started = Instant::now();
        let out = f();
        self.record_nanos(started.elapsed().as_nanos() as u64);
        out
    }

    pub fn record(&self, duration_s: f64) {
        self.record_nanos((duration_s * 1e9) as u64);
    }

    fn record_nanos(&self, nanos: u64) {
        self.total_ns.fetch_add(nanos, Ordering::Relaxed);
        self.max_ns.fetch_max(nanos, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_ns.load(Ordering::Relaxed) as f64 * 1e-9
    }

    pub fn max_seconds(&self) -> f64 {
        self.max_ns.load(Ordering::Relaxed) as f64 * 1e-9
    }

    /// Zero when nothing was recorded.
    pub fn average_seconds(&self) -> f64 {
        match self.count() {
            0 => 0.0,
            n => self.total_seconds() / n as f64,
        }
    }

    pub fn reset(&self) {
        self.total_ns.store(0, Ordering::Relaxed);
        self.max_ns.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }
}
