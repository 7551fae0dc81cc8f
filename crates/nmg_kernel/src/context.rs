//! The one piece of process-wide mutable state the kernel allows:
//! attempt/success/write counters and a cancel flag, both atomic, bundled
//! with the tolerance pair every entry point needs.
//!
//! This replaces the source's global debug-flag and counter variables —
//! everything else is threaded explicitly through function arguments
//! rather than read from statics.

use nmg_math::{ChordTolerance, Tolerance};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

/// Snapshot of [`Stats`] at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Regions the walker attempted to evaluate.
    pub tried: u64,
    /// Regions that produced a non-empty shell after cleanup.
    pub converted: u64,
    /// Regions actually delivered to the region sink.
    pub written: u64,
}

/// Atomic region counters, safe to share across worker threads.
#[derive(Debug, Default)]
pub struct Stats {
    tried: AtomicU64,
    converted: AtomicU64,
    written: AtomicU64,
}

impl Stats {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_tried(&self) {
        self.tried.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_converted(&self) {
        self.converted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_written(&self) {
        self.written.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all three counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            tried: self.tried.load(Ordering::Relaxed),
            converted: self.converted.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
        }
    }
}

/// Process-wide log-level gate, read with an atomic load only — this is
/// the one exception to "no global state" the design allows, since a
/// `log::Level` check at every call site would otherwise need a static
/// anyway.
#[derive(Debug)]
pub struct LogGate(AtomicU8);

impl LogGate {
    /// A gate initialized to `log::LevelFilter::Info`.
    pub fn new() -> Self {
        Self(AtomicU8::new(log::LevelFilter::Info as u8))
    }

    /// Raise or lower the gate.
    pub fn set_level(&self, level: log::LevelFilter) {
        self.0.store(level as u8, Ordering::Relaxed);
    }

    /// `true` iff `level` is at or above the current gate.
    pub fn enabled(&self, level: log::Level) -> bool {
        (level as u8) <= self.0.load(Ordering::Relaxed)
    }
}

impl Default for LogGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicit replacement for the source's scattered globals: every
/// entry point takes a `&Context` rather than reaching for statics.
#[derive(Debug, Clone)]
pub struct Context {
    /// Distance/parallelism tolerance bundle.
    pub tol: Tolerance,
    /// Chord tolerance bundle governing primitive tessellation fidelity.
    pub ttol: ChordTolerance,
    /// Shared region counters.
    pub stats: Arc<Stats>,
    /// Checked at region boundaries by [`crate::tree::walk_tree`].
    pub cancel_flag: Arc<AtomicBool>,
    /// Log-level gate, atomics only.
    pub log_sink: Arc<LogGate>,
}

impl Context {
    /// Build a context from a tolerance pair, with fresh stats, an
    /// unset cancel flag, and a default log gate.
    pub fn new(tol: Tolerance, ttol: ChordTolerance) -> Self {
        Self {
            tol,
            ttol,
            stats: Arc::new(Stats::new()),
            cancel_flag: Arc::new(AtomicBool::new(false)),
            log_sink: Arc::new(LogGate::new()),
        }
    }

    /// `true` if the cancel flag has been set by the caller.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}
