//! FrameSink trait - output sink interface
//!
//! Defines the abstract interface for display/streaming surfaces.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ColorFrame, ContractError};

/// Frame output trait
///
/// All sink implementations must implement this trait. A sink is started
/// once, receives finished projector frames via `publish`, and is stopped
/// exactly once when the owning session closes.
#[trait_variant::make(FrameSink: Send)]
pub trait LocalFrameSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Publish a finished projector frame
    ///
    /// # Errors
    /// Returns a publish error (should include context); the caller keeps
    /// running on failure.
    async fn publish(&mut self, frame: &ColorFrame) -> Result<(), ContractError>;

    /// Hint the display refresh interval to the surface
    fn set_refresh_interval(&mut self, interval: Duration);

    /// Prepare the surface for publishing
    async fn start(&mut self) -> Result<(), ContractError>;

    /// Release the surface
    async fn stop(&mut self) -> Result<(), ContractError>;
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Queue capacity of the isolated sink worker
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    100
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Frame summaries via tracing
    Log,
    /// PNG files in a directory
    PngDir,
    /// In-memory buffer (tests, previews)
    Memory,
}
