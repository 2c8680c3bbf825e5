//! Logger metrics for observability
//!
//! Everything past the enqueue boundary is fire-and-forget, so these counters
//! are how an application notices lost records, a saturated queue or a
//! retention sweep that keeps failing.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_rotating_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_written();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.written(), 1);
/// assert_eq!(metrics.failed_writes(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Jobs accepted by the dispatch queue
    enqueued: AtomicU64,

    /// Payloads fully written to a rotated file
    written: AtomicU64,

    /// Payloads lost after the open or write retry also failed
    failed_writes: AtomicU64,

    /// Number of times a producer found the queue full and had to block
    block_events: AtomicU64,

    /// Handle replacements (suffix change or externally deleted file)
    rotations: AtomicU64,

    /// Retention sweeps run
    sweeps: AtomicU64,

    /// Expired files removed by sweeps
    files_removed: AtomicU64,

    /// Expired files a sweep could not remove
    sweep_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            written: AtomicU64::new(0),
            failed_writes: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            sweeps: AtomicU64::new(0),
            files_removed: AtomicU64::new(0),
            sweep_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn files_removed(&self) -> u64 {
        self.files_removed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sweep_failures(&self) -> u64 {
        self.sweep_failures.load(Ordering::Relaxed)
    }

    /// Record an accepted job, returning the previous count
    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a lost payload, returning the previous count
    #[inline]
    pub fn record_failed_write(&self) -> u64 {
        self.failed_writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rotation(&self) -> u64 {
        self.rotations.fetch_add(1, Ordering::Relaxed)
    }

    /// Record one finished sweep with its removed and failed file counts
    pub fn record_sweep(&self, removed: usize, failed: usize) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.files_removed.fetch_add(removed as u64, Ordering::Relaxed);
        self.sweep_failures.fetch_add(failed as u64, Ordering::Relaxed);
    }

    /// Get loss rate as a percentage (0.0 - 100.0) of finished flushes
    ///
    /// Returns 0.0 if nothing has been flushed yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_writes() as f64;
        let total = self.written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.written.store(0, Ordering::Relaxed);
        self.failed_writes.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
        self.rotations.store(0, Ordering::Relaxed);
        self.sweeps.store(0, Ordering::Relaxed);
        self.files_removed.store(0, Ordering::Relaxed);
        self.sweep_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            written: AtomicU64::new(self.written()),
            failed_writes: AtomicU64::new(self.failed_writes()),
            block_events: AtomicU64::new(self.block_events()),
            rotations: AtomicU64::new(self.rotations()),
            sweeps: AtomicU64::new(self.sweeps()),
            files_removed: AtomicU64::new(self.files_removed()),
            sweep_failures: AtomicU64::new(self.sweep_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.enqueued(), 0);
        assert_eq!(metrics.written(), 0);
        assert_eq!(metrics.failed_writes(), 0);
        assert_eq!(metrics.block_events(), 0);
        assert_eq!(metrics.sweeps(), 0);
    }

    #[test]
    fn test_record_returns_previous() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_failed_write(), 0);
        assert_eq!(metrics.record_failed_write(), 1);
        assert_eq!(metrics.failed_writes(), 2);
    }

    #[test]
    fn test_record_sweep() {
        let metrics = LoggerMetrics::new();
        metrics.record_sweep(2, 0);
        metrics.record_sweep(0, 1);
        assert_eq!(metrics.sweeps(), 2);
        assert_eq!(metrics.files_removed(), 2);
        assert_eq!(metrics.sweep_failures(), 1);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_written();
        }
        for _ in 0..10 {
            metrics.record_failed_write();
        }

        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let metrics = LoggerMetrics::new();
        metrics.record_enqueued();
        let snapshot = metrics.clone();
        metrics.record_enqueued();
        assert_eq!(snapshot.enqueued(), 1);
        assert_eq!(metrics.enqueued(), 2);

        metrics.reset();
        assert_eq!(metrics.enqueued(), 0);
    }
}
