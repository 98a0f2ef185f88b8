//! LogSink - logs frame summaries via tracing

use std::time::Duration;

use contracts::{ColorFrame, ContractError, FrameSink};
use tracing::{info, instrument};

/// Sink that logs frame summaries for debugging
pub struct LogSink {
    name: String,
    refresh_interval: Duration,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            refresh_interval: Duration::from_millis(100),
        }
    }
}

impl FrameSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_publish",
        skip(self, frame),
        fields(sink = %self.name, frame_id = frame.frame_id)
    )]
    async fn publish(&mut self, frame: &ColorFrame) -> Result<(), ContractError> {
        info!(
            sink = %self.name,
            frame_id = frame.frame_id,
            timestamp = frame.timestamp,
            width = frame.width(),
            height = frame.height(),
            "projector frame published"
        );
        Ok(())
    }

    fn set_refresh_interval(&mut self, interval: Duration) {
        self.refresh_interval = interval;
    }

    async fn start(&mut self) -> Result<(), ContractError> {
        info!(
            sink = %self.name,
            refresh_ms = self.refresh_interval.as_millis() as u64,
            "LogSink started"
        );
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "LogSink stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_log_sink_publish() {
        let mut sink = LogSink::new("test_log");
        let frame = ColorFrame::new(1, 1, 1, 0.0, Bytes::from(vec![0u8; 4]));
        assert!(sink.publish(&frame).await.is_ok());
    }

    #[tokio::test]
    async fn test_log_sink_name() {
        let sink = LogSink::new("my_logger");
        assert_eq!(sink.name(), "my_logger");
    }
}
