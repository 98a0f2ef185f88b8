//! Per-sink worker metrics

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Sink worker metrics
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Frames published successfully
    publish_count: AtomicU64,

    /// Publish failures
    failure_count: AtomicU64,

    /// Frames dropped because the queue was full
    dropped_count: AtomicU64,

    /// Approximate queue length
    queue_len: AtomicUsize,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_publish_count(&self) {
        self.publish_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn publish_count(&self) -> u64 {
        self.publish_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            publish_count: self.publish_count(),
            failure_count: self.failure_count(),
            dropped_count: self.dropped_count(),
            queue_len: self.queue_len.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub publish_count: u64,
    pub failure_count: u64,
    pub dropped_count: u64,
    pub queue_len: usize,
}
