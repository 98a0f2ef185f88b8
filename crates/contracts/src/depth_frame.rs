//! DepthFrame - Depth source output
//!
//! A single depth sample grid as produced by one `poll()`.

use serde::{Deserialize, Serialize};

/// One depth frame: a 2D grid of millimeter distances with per-cell validity.
///
/// Invalid cells (occlusion, out-of-range, failed readout) are encoded as
/// `f32::NAN`; use [`DepthFrame::get`] to read cells without seeing the
/// sentinel. A frame is immutable after construction and owned by the caller
/// that polled it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthFrame {
    width: u32,
    height: u32,

    /// Per-source frame counter
    pub frame_id: u64,

    /// Seconds since the source started - primary clock
    pub timestamp: f64,

    /// Row-major distances in millimeters, `NAN` = invalid
    values: Vec<f32>,
}

impl DepthFrame {
    /// Create a frame from row-major millimeter values.
    ///
    /// # Panics
    /// Panics if `values.len() != width * height`.
    pub fn new(width: u32, height: u32, frame_id: u64, timestamp: f64, values: Vec<f32>) -> Self {
        assert_eq!(
            values.len(),
            (width as usize) * (height as usize),
            "depth frame buffer does not match {width}x{height}"
        );
        Self {
            width,
            height,
            frame_id,
            timestamp,
            values,
        }
    }

    /// Create a frame with every cell marked invalid (best-effort degraded poll).
    pub fn all_invalid(width: u32, height: u32, frame_id: u64, timestamp: f64) -> Self {
        Self {
            width,
            height,
            frame_id,
            timestamp,
            values: vec![f32::NAN; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw row-major cell buffer (`NAN` = invalid).
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Depth at `(x, y)` in millimeters, `None` if invalid or out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let v = self.values[(y as usize) * (self.width as usize) + (x as usize)];
        if v.is_nan() { None } else { Some(v) }
    }

    /// Fraction of cells carrying a valid distance, in `[0, 1]`.
    pub fn valid_fraction(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let valid = self.values.iter().filter(|v| !v.is_nan()).count();
        valid as f64 / self.values.len() as f64
    }
}
