//! Per-source poll metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Depth source metrics
#[derive(Debug, Default)]
pub struct SourceMetrics {
    /// Total frames polled
    pub frames_polled: AtomicU64,

    /// Polls that came back fully invalid (degraded readout)
    pub degraded_frames: AtomicU64,
}

impl SourceMetrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed poll
    pub fn record_poll(&self) {
        self.frames_polled.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("depth_frames_polled").increment(1);
    }

    /// Record a degraded (all-invalid) poll
    pub fn record_degraded(&self) {
        self.degraded_frames.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("depth_frames_degraded").increment(1);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> SourceMetricsSnapshot {
        SourceMetricsSnapshot {
            frames_polled: self.frames_polled.load(Ordering::Relaxed),
            degraded_frames: self.degraded_frames.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceMetricsSnapshot {
    pub frames_polled: u64,
    pub degraded_frames: u64,
}
