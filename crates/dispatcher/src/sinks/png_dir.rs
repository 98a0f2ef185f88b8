//! PngDirectorySink - writes frames to disk as PNG files
//!
//! Each published frame lands as `frame_<id>.png` plus a small JSON sidecar
//! with its timing, which makes calibration sessions inspectable after the
//! fact.

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

use contracts::{ColorFrame, ContractError, FrameSink};
use serde::Serialize;
use tracing::{debug, error, instrument};

/// Configuration for PngDirectorySink
#[derive(Debug, Clone)]
pub struct PngDirectoryConfig {
    /// Base output directory
    pub base_path: PathBuf,
}

impl PngDirectoryConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./frames"));

        Self { base_path }
    }
}

/// Frame sidecar metadata
#[derive(Serialize)]
struct FrameMeta {
    frame_id: u64,
    timestamp: f64,
    width: u32,
    height: u32,
}

/// Sink that writes projector frames to disk
pub struct PngDirectorySink {
    name: String,
    config: PngDirectoryConfig,
}

impl PngDirectorySink {
    /// Create a new PngDirectorySink
    pub fn new(name: impl Into<String>, config: PngDirectoryConfig) -> std::io::Result<Self> {
        fs::create_dir_all(&config.base_path)?;

        Ok(Self {
            name: name.into(),
            config,
        })
    }

    /// Create from params map (for the factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = PngDirectoryConfig::from_params(params);
        Self::new(name, config)
    }

    fn write_frame_to_disk(&self, frame: &ColorFrame) -> std::io::Result<()> {
        let png_path = self
            .config
            .base_path
            .join(format!("frame_{:06}.png", frame.frame_id));
        image::save_buffer(
            png_path,
            frame.pixels(),
            frame.width(),
            frame.height(),
            image::ColorType::Rgba8,
        )
        .map_err(std::io::Error::other)?;

        let meta_path = self
            .config
            .base_path
            .join(format!("frame_{:06}.json", frame.frame_id));
        let meta_file = File::create(meta_path)?;
        serde_json::to_writer(
            meta_file,
            &FrameMeta {
                frame_id: frame.frame_id,
                timestamp: frame.timestamp,
                width: frame.width(),
                height: frame.height(),
            },
        )
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        Ok(())
    }

    fn persist_frame(&self, frame: &ColorFrame) -> Result<(), ContractError> {
        self.write_frame_to_disk(frame).map_err(|e| {
            error!(sink = %self.name, frame_id = frame.frame_id, error = %e, "write failed");
            ContractError::sink_publish(&self.name, e.to_string())
        })
    }
}

impl FrameSink for PngDirectorySink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "png_sink_publish",
        skip(self, frame),
        fields(sink = %self.name, frame_id = frame.frame_id)
    )]
    async fn publish(&mut self, frame: &ColorFrame) -> Result<(), ContractError> {
        self.persist_frame(frame)?;
        Ok(())
    }

    fn set_refresh_interval(&mut self, _interval: Duration) {
        // Disk output has no refresh cadence of its own
    }

    async fn start(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, path = %self.config.base_path.display(), "PngDirectorySink started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, "PngDirectorySink stopped");
        Ok(())
    }
}
