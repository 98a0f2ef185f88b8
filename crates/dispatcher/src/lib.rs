//! # Dispatcher
//!
//! Output side of the pipeline.
//!
//! Responsibilities:
//! - `FrameSink` implementations (log / png directory / memory)
//! - isolating each sink behind a worker task with a bounded queue, so a
//!   slow display surface never blocks the render loop

pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{FrameSink, SinkConfig, SinkType};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{LogSink, MemoryBuffer, MemorySink, PngDirectorySink};

use std::time::Duration;
use tracing::instrument;

/// Create a running [`SinkHandle`] from configuration
#[instrument(
    name = "dispatcher_create_sink_handle",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
pub fn create_sink_handle(
    config: &SinkConfig,
    refresh_interval: Duration,
) -> Result<SinkHandle, DispatcherError> {
    match config.sink_type {
        SinkType::Log => {
            let sink = LogSink::new(&config.name);
            Ok(SinkHandle::spawn(sink, config.queue_capacity, refresh_interval))
        }
        SinkType::PngDir => {
            let sink = PngDirectorySink::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(SinkHandle::spawn(sink, config.queue_capacity, refresh_interval))
        }
        SinkType::Memory => {
            let sink = MemorySink::from_params(&config.name, &config.params);
            Ok(SinkHandle::spawn(sink, config.queue_capacity, refresh_interval))
        }
    }
}
