//! Aggregate counters shared by all virtual users.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub struct LoadMetrics {
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    response_time_us: AtomicU64,
}

/// Point-in-time copy of [`LoadMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Mean response time over all requests, in milliseconds.
    pub avg_response_time_ms: f64,
}

impl LoadMetrics {
    pub fn record(&self, success: bool, elapsed: Duration) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        let us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.response_time_us.fetch_add(us, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
        self.successful.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.response_time_us.store(0, Ordering::Relaxed);
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total.load(Ordering::Relaxed);
        let total_us = self.response_time_us.load(Ordering::Relaxed);
        let avg_response_time_ms = if total == 0 {
            0.0
        } else {
            total_us as f64 / total as f64 / 1000.0
        };
        MetricsSnapshot {
            total_requests: total,
            successful_requests: self.successful.load(Ordering::Relaxed),
            failed_requests: self.failed.load(Ordering::Relaxed),
            avg_response_time_ms,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_zero_mean() {
        let m = LoadMetrics::default();
        let snap = m.snapshot();
        assert_eq!(snap.total_requests, 0);
        assert!(snap.avg_response_time_ms.abs() < f64::EPSILON);
    }

    #[test]
    fn mean_is_over_all_requests() {
        let m = LoadMetrics::default();
        m.record(true, Duration::from_millis(10));
        m.record(false, Duration::from_millis(30));
        m.record(true, Duration::from_millis(20));

        let snap = m.snapshot();
        assert_eq!(snap.total_requests, 3);
        assert_eq!(snap.successful_requests, 2);
        assert_eq!(snap.failed_requests, 1);
        assert!((snap.avg_response_time_ms - 20.0).abs() < 1e-9);
    }

    #[test]
    fn reset_clears_everything() {
        let m = LoadMetrics::default();
        m.record(true, Duration::from_millis(5));
        m.reset();
        assert_eq!(m.snapshot().total_requests, 0);
    }
}
