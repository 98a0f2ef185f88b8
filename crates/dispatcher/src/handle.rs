//! SinkHandle - manages a sink with isolated queue and worker task

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use contracts::{ColorFrame, FrameSink};

use crate::metrics::SinkMetrics;

/// Handle to a running sink worker
pub struct SinkHandle {
    /// Sink name
    name: String,
    /// Channel to send frames to the worker
    tx: mpsc::Sender<ColorFrame>,
    /// Shared metrics
    metrics: Arc<SinkMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl SinkHandle {
    /// Create a new SinkHandle and spawn the worker task.
    ///
    /// The worker passes `refresh_interval` to the sink and starts it before
    /// consuming frames; it stops the sink when the handle shuts down.
    pub fn spawn<S: FrameSink + Send + 'static>(
        sink: S,
        queue_capacity: usize,
        refresh_interval: Duration,
    ) -> Self {
        let name = sink.name().to_string();
        let (tx, rx) = mpsc::channel(queue_capacity);
        let metrics = Arc::new(SinkMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_name = name.clone();

        let worker_handle = tokio::spawn(async move {
            sink_worker(sink, rx, worker_metrics, worker_name, refresh_interval).await;
        });

        Self {
            name,
            tx,
            metrics,
            worker_handle,
        }
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Send a frame to the sink (non-blocking)
    ///
    /// Returns true if queued, false if the queue was full (frame dropped)
    /// or the worker already stopped.
    pub fn try_send(&self, frame: ColorFrame) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => {
                self.metrics.set_queue_len(self.tx.capacity());
                true
            }
            Err(mpsc::error::TrySendError::Full(f)) => {
                self.metrics.inc_dropped_count();
                warn!(
                    sink = %self.name,
                    frame_id = f.frame_id,
                    "queue full, frame dropped"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!(sink = %self.name, "sink worker closed unexpectedly");
                false
            }
        }
    }

    /// Shutdown the sink worker gracefully
    #[instrument(name = "sink_handle_shutdown", skip(self))]
    pub async fn shutdown(self) {
        // Drop sender to signal the worker to stop
        drop(self.tx);
        // Wait for the worker (which stops the sink) to finish
        if let Err(e) = self.worker_handle.await {
            error!(sink = %self.name, error = ?e, "worker task panicked");
        }
        debug!(sink = %self.name, "sink handle shutdown complete");
    }
}

/// Worker task that starts the sink, consumes frames, and stops the sink
#[instrument(
    name = "sink_worker_loop",
    skip(sink, rx, metrics, refresh_interval),
    fields(sink = %name)
)]
async fn sink_worker<S: FrameSink>(
    mut sink: S,
    mut rx: mpsc::Receiver<ColorFrame>,
    metrics: Arc<SinkMetrics>,
    name: String,
    refresh_interval: Duration,
) {
    sink.set_refresh_interval(refresh_interval);
    if let Err(e) = sink.start().await {
        error!(sink = %name, error = %e, "sink failed to start");
    }
    debug!(sink = %name, "sink worker started");

    while let Some(frame) = rx.recv().await {
        metrics.set_queue_len(rx.len());

        match sink.publish(&frame).await {
            Ok(()) => {
                metrics.inc_publish_count();
            }
            Err(e) => {
                metrics.inc_failure_count();
                error!(
                    sink = %name,
                    frame_id = frame.frame_id,
                    error = %e,
                    "publish failed"
                );
                // Keep consuming - a single failed frame is not fatal
            }
        }
    }

    if let Err(e) = sink.stop().await {
        error!(sink = %name, error = %e, "stop failed on shutdown");
    }

    debug!(sink = %name, "sink worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::ContractError;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use tokio::time::sleep;

    fn test_frame(frame_id: u64) -> ColorFrame {
        ColorFrame::new(2, 2, frame_id, 0.0, Bytes::from(vec![255u8; 16]))
    }

    /// Mock sink for testing
    struct MockSink {
        name: String,
        publish_count: Arc<AtomicU64>,
        stopped: Arc<AtomicBool>,
        should_fail: bool,
        delay_ms: u64,
    }

    impl FrameSink for MockSink {
        fn name(&self) -> &str {
            &self.name
        }

        async fn publish(&mut self, _frame: &ColorFrame) -> Result<(), ContractError> {
            if self.delay_ms > 0 {
                sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.should_fail {
                return Err(ContractError::sink_publish(&self.name, "mock failure"));
            }
            self.publish_count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn set_refresh_interval(&mut self, _interval: Duration) {}

        async fn start(&mut self) -> Result<(), ContractError> {
            Ok(())
        }

        async fn stop(&mut self) -> Result<(), ContractError> {
            self.stopped.store(true, Ordering::Relaxed);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sink_handle_publishes_and_stops() {
        let publish_count = Arc::new(AtomicU64::new(0));
        let stopped = Arc::new(AtomicBool::new(false));
        let sink = MockSink {
            name: "test".to_string(),
            publish_count: Arc::clone(&publish_count),
            stopped: Arc::clone(&stopped),
            should_fail: false,
            delay_ms: 0,
        };

        let handle = SinkHandle::spawn(sink, 10, Duration::from_millis(100));

        for i in 0..5 {
            assert!(handle.try_send(test_frame(i)));
        }

        handle.shutdown().await;
        assert_eq!(publish_count.load(Ordering::Relaxed), 5);
        assert!(stopped.load(Ordering::Relaxed), "stop must run on shutdown");
    }

    #[tokio::test]
    async fn test_sink_handle_queue_full_drops() {
        let sink = MockSink {
            name: "slow".to_string(),
            publish_count: Arc::new(AtomicU64::new(0)),
            stopped: Arc::new(AtomicBool::new(false)),
            should_fail: false,
            delay_ms: 100, // slow sink
        };

        let handle = SinkHandle::spawn(sink, 2, Duration::from_millis(100));

        for i in 0..10 {
            handle.try_send(test_frame(i));
        }

        assert!(handle.metrics().dropped_count() > 0);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_sink_handle_failure_isolation() {
        let sink = MockSink {
            name: "failing".to_string(),
            publish_count: Arc::new(AtomicU64::new(0)),
            stopped: Arc::new(AtomicBool::new(false)),
            should_fail: true,
            delay_ms: 0,
        };

        let handle = SinkHandle::spawn(sink, 10, Duration::from_millis(100));

        for i in 0..3 {
            handle.try_send(test_frame(i));
        }

        sleep(Duration::from_millis(50)).await;
        assert!(handle.metrics().failure_count() > 0);

        handle.shutdown().await;
    }
}
