//! MemorySink - retains published frames in memory
//!
//! Test double for the display surface; also handy for previews. Keeps the
//! most recent `capacity` frames.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use contracts::{ColorFrame, ContractError, FrameSink};
use tracing::debug;

const DEFAULT_CAPACITY: usize = 64;

/// Shared view over the frames a [`MemorySink`] has received
#[derive(Clone, Default)]
pub struct MemoryBuffer {
    frames: Arc<Mutex<VecDeque<ColorFrame>>>,
}

impl MemoryBuffer {
    /// Number of retained frames
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Most recently published frame, if any
    pub fn latest(&self) -> Option<ColorFrame> {
        self.lock().back().cloned()
    }

    /// Snapshot of all retained frames, oldest first
    pub fn frames(&self) -> Vec<ColorFrame> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<ColorFrame>> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sink that appends published frames to a shared in-memory buffer
pub struct MemorySink {
    name: String,
    buffer: MemoryBuffer,
    capacity: usize,
}

impl MemorySink {
    /// Create a new MemorySink retaining up to `capacity` frames
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            buffer: MemoryBuffer::default(),
            capacity: capacity.max(1),
        }
    }

    /// Create from params map (for the factory); param `capacity` optional
    pub fn from_params(name: impl Into<String>, params: &HashMap<String, String>) -> Self {
        let capacity = params
            .get("capacity")
            .and_then(|c| c.parse().ok())
            .unwrap_or(DEFAULT_CAPACITY);
        Self::new(name, capacity)
    }

    /// Handle to the shared frame buffer; take it before spawning the sink
    pub fn buffer(&self) -> MemoryBuffer {
        self.buffer.clone()
    }
}

impl FrameSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&mut self, frame: &ColorFrame) -> Result<(), ContractError> {
        let mut frames = self.buffer.lock();
        if frames.len() == self.capacity {
            frames.pop_front();
        }
        frames.push_back(frame.clone());
        Ok(())
    }

    fn set_refresh_interval(&mut self, _interval: Duration) {}

    async fn start(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, capacity = self.capacity, "MemorySink started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, retained = self.buffer.len(), "MemorySink stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn frame(id: u64) -> ColorFrame {
        ColorFrame::new(1, 1, id, 0.0, Bytes::from(vec![0u8; 4]))
    }

    #[tokio::test]
    async fn test_memory_sink_retains_frames() {
        let mut sink = MemorySink::new("mem", 10);
        let buffer = sink.buffer();

        for i in 1..=3 {
            sink.publish(&frame(i)).await.unwrap();
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.latest().unwrap().frame_id, 3);
    }

    #[tokio::test]
    async fn test_memory_sink_caps_retention() {
        let mut sink = MemorySink::new("mem", 2);
        let buffer = sink.buffer();

        for i in 1..=5 {
            sink.publish(&frame(i)).await.unwrap();
        }

        let ids: Vec<u64> = buffer.frames().iter().map(|f| f.frame_id).collect();
        assert_eq!(ids, vec![4, 5]);
    }
}
