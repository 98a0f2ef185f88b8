//! Session metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Calibration session metrics
#[derive(Debug, Default)]
pub struct SessionMetrics {
    /// Frames rendered and handed to the sink
    pub frames_rendered: AtomicU64,

    /// Renders fed by an all-invalid source frame
    pub degraded_renders: AtomicU64,

    /// Profile mutations rejected by invariant checks
    pub mutations_rejected: AtomicU64,
}

impl SessionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed render
    pub fn record_rendered(&self) {
        self.frames_rendered.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("session_frames_rendered").increment(1);
    }

    /// Record a render against an all-invalid frame
    pub fn record_degraded(&self) {
        self.degraded_renders.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("session_degraded_renders").increment(1);
    }

    /// Record a rejected mutation
    pub fn record_rejected(&self) {
        self.mutations_rejected.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("session_mutations_rejected").increment(1);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> SessionMetricsSnapshot {
        SessionMetricsSnapshot {
            frames_rendered: self.frames_rendered.load(Ordering::Relaxed),
            degraded_renders: self.degraded_renders.load(Ordering::Relaxed),
            mutations_rejected: self.mutations_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionMetricsSnapshot {
    pub frames_rendered: u64,
    pub degraded_renders: u64,
    pub mutations_rejected: u64,
}
