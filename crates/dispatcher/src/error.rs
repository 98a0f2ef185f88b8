//! Dispatcher error types

use thiserror::Error;

/// Errors from sink creation and the sink worker
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink could not be constructed from its configuration
    #[error("failed to create sink '{sink}': {message}")]
    SinkCreation { sink: String, message: String },
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            sink: sink.into(),
            message: message.into(),
        }
    }
}
