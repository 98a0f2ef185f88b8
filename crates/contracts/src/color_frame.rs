//! ColorFrame - Transform engine output
//!
//! The finished projector canvas handed to output sinks.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Background color for cells with nothing to show: uncovered canvas,
/// invalid sensor cells, depths outside the calibrated range. White makes
/// misalignment obvious against the colorized sandbox during calibration.
pub const BACKGROUND_RGBA: [u8; 4] = [255, 255, 255, 255];

/// A colorized projector frame, RGBA8 row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorFrame {
    width: u32,
    height: u32,

    /// Frame counter carried over from the source frame
    pub frame_id: u64,

    /// Timestamp carried over from the source frame (seconds)
    pub timestamp: f64,

    /// RGBA8 pixel data (zero-copy)
    pixels: Bytes,
}

impl ColorFrame {
    /// Create a frame from an RGBA8 buffer.
    ///
    /// # Panics
    /// Panics if `pixels.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, frame_id: u64, timestamp: f64, pixels: Bytes) -> Self {
        assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 4,
            "rgba buffer does not match {width}x{height}"
        );
        Self {
            width,
            height,
            frame_id,
            timestamp,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 buffer.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, `None` if out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_access() {
        let mut buf = vec![0u8; 2 * 2 * 4];
        buf[4..8].copy_from_slice(&[10, 20, 30, 255]);
        let frame = ColorFrame::new(2, 2, 1, 0.0, Bytes::from(buf));
        assert_eq!(frame.pixel(1, 0), Some([10, 20, 30, 255]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(frame.pixel(2, 0), None);
    }
}
