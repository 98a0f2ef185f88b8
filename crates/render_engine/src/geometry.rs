//! Geometric stages: rotate, crop, scale, place
//!
//! All stages operate on depth grids and preserve the invalid-cell mask.
//! Resampling is bilinear throughout; a sample whose footprint touches an
//! invalid or out-of-bounds cell is itself invalid, so frame edges grow an
//! invalid margin under rotation instead of wrapping around.

use contracts::DepthFrame;
use nalgebra::{Point2, Rotation2};

/// Weights below this contribute nothing; their source cell need not exist.
/// Keeps integral sample coordinates exact (identity at 0° / scale 1).
const WEIGHT_EPS: f64 = 1e-9;

/// Rotate a frame by `degrees` about its center, output same size.
///
/// Positive angles rotate the image counter-clockwise. Cells whose source
/// falls outside the input are invalid.
pub fn rotate(frame: &DepthFrame, degrees: f64) -> DepthFrame {
    if degrees == 0.0 {
        return frame.clone();
    }

    let (width, height) = (frame.width(), frame.height());
    let center = Point2::new(
        (width as f64 - 1.0) / 2.0,
        (height as f64 - 1.0) / 2.0,
    );
    // Inverse mapping: walk output cells, sample where they came from.
    let rot = Rotation2::new(degrees.to_radians());

    let mut values = Vec::with_capacity((width as usize) * (height as usize));
    for y in 0..height {
        for x in 0..width {
            let out = Point2::new(x as f64, y as f64);
            let src = center + rot * (out - center);
            values.push(bilinear(frame, src.x, src.y).unwrap_or(f32::NAN));
        }
    }
    DepthFrame::new(width, height, frame.frame_id, frame.timestamp, values)
}

/// Crop to `[x_lim.0, x_lim.1) × [y_lim.0, y_lim.1)` in source pixels.
///
/// The window may reach past the frame; cells beyond it are invalid. The
/// degenerate case (`min == max`) is rejected at the profile boundary and
/// never reaches this stage.
pub fn crop(frame: &DepthFrame, x_lim: (u32, u32), y_lim: (u32, u32)) -> DepthFrame {
    let out_w = x_lim.1 - x_lim.0;
    let out_h = y_lim.1 - y_lim.0;

    let mut values = Vec::with_capacity((out_w as usize) * (out_h as usize));
    for y in 0..out_h {
        for x in 0..out_w {
            let v = frame.get(x_lim.0 + x, y_lim.0 + y).unwrap_or(f32::NAN);
            values.push(v);
        }
    }
    DepthFrame::new(out_w, out_h, frame.frame_id, frame.timestamp, values)
}

/// Scale a frame by `factor` (> 0), bilinear, output `round(dim · factor)`
/// clamped to at least 1×1.
pub fn scale(frame: &DepthFrame, factor: f64) -> DepthFrame {
    if factor == 1.0 {
        return frame.clone();
    }

    let out_w = ((frame.width() as f64 * factor).round() as u32).max(1);
    let out_h = ((frame.height() as f64 * factor).round() as u32).max(1);

    let mut values = Vec::with_capacity((out_w as usize) * (out_h as usize));
    for y in 0..out_h {
        for x in 0..out_w {
            // Center-aligned inverse mapping, clamped to the source footprint
            // so resampling alone never manufactures an invalid border
            let sx = ((x as f64 + 0.5) / factor - 0.5).clamp(0.0, frame.width() as f64 - 1.0);
            let sy = ((y as f64 + 0.5) / factor - 0.5).clamp(0.0, frame.height() as f64 - 1.0);
            values.push(bilinear(frame, sx, sy).unwrap_or(f32::NAN));
        }
    }
    DepthFrame::new(out_w, out_h, frame.frame_id, frame.timestamp, values)
}

/// Place a frame onto an all-invalid canvas at `(x_pos, y_pos)`.
/// Parts falling outside the canvas are discarded.
pub fn place(
    frame: &DepthFrame,
    x_pos: i32,
    y_pos: i32,
    canvas_width: u32,
    canvas_height: u32,
) -> DepthFrame {
    let mut values = vec![f32::NAN; (canvas_width as usize) * (canvas_height as usize)];

    for y in 0..frame.height() {
        let cy = y as i64 + y_pos as i64;
        if cy < 0 || cy >= canvas_height as i64 {
            continue;
        }
        for x in 0..frame.width() {
            let cx = x as i64 + x_pos as i64;
            if cx < 0 || cx >= canvas_width as i64 {
                continue;
            }
            if let Some(v) = frame.get(x, y) {
                values[(cy as usize) * (canvas_width as usize) + cx as usize] = v;
            }
        }
    }
    DepthFrame::new(
        canvas_width,
        canvas_height,
        frame.frame_id,
        frame.timestamp,
        values,
    )
}

/// Bilinear sample at fractional source coordinates.
///
/// `None` when any sample with non-negligible weight is invalid or outside
/// the frame. Integral coordinates degenerate to an exact cell read.
fn bilinear(frame: &DepthFrame, sx: f64, sy: f64) -> Option<f32> {
    let x0 = sx.floor();
    let y0 = sy.floor();
    let tx = sx - x0;
    let ty = sy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let mut num = 0.0f64;
    for (xi, yi, w) in [
        (x0, y0, (1.0 - tx) * (1.0 - ty)),
        (x0 + 1, y0, tx * (1.0 - ty)),
        (x0, y0 + 1, (1.0 - tx) * ty),
        (x0 + 1, y0 + 1, tx * ty),
    ] {
        if w <= WEIGHT_EPS {
            continue;
        }
        let v = cell(frame, xi, yi)?;
        num += w * v as f64;
    }
    Some(num as f32)
}

fn cell(frame: &DepthFrame, x: i64, y: i64) -> Option<f32> {
    if x < 0 || y < 0 {
        return None;
    }
    frame.get(x as u32, y as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_frame(width: u32, height: u32, mx: u32, my: u32) -> DepthFrame {
        let mut values = vec![1000.0f32; (width * height) as usize];
        values[(my * width + mx) as usize] = 1200.0;
        DepthFrame::new(width, height, 1, 0.0, values)
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let frame = marker_frame(7, 5, 3, 2);
        let rotated = rotate(&frame, 0.0);
        assert_eq!(frame.values(), rotated.values());
    }

    #[test]
    fn test_rotate_quarter_turn_is_ccw() {
        // Marker at right-center should land at top-center after +90°
        let frame = marker_frame(5, 5, 4, 2);
        let rotated = rotate(&frame, 90.0);
        assert_eq!(rotated.get(2, 0), Some(1200.0));
    }

    #[test]
    fn test_rotate_marks_corners_invalid() {
        let frame = marker_frame(9, 9, 4, 4);
        let rotated = rotate(&frame, 45.0);
        // Corners leave the source footprint and must not wrap around
        assert_eq!(rotated.get(0, 0), None);
        assert_eq!(rotated.get(8, 8), None);
        // Center survives
        assert_eq!(rotated.get(4, 4), Some(1200.0));
    }

    #[test]
    fn test_crop_window() {
        let frame = marker_frame(10, 10, 4, 5);
        let cropped = crop(&frame, (2, 8), (3, 9));
        assert_eq!(cropped.width(), 6);
        assert_eq!(cropped.height(), 6);
        assert_eq!(cropped.get(2, 2), Some(1200.0)); // (4,5) shifted by (2,3)
    }

    #[test]
    fn test_crop_past_frame_is_invalid() {
        let frame = marker_frame(4, 4, 0, 0);
        let cropped = crop(&frame, (2, 6), (0, 4));
        assert_eq!(cropped.get(0, 0), Some(1000.0));
        assert_eq!(cropped.get(3, 0), None); // source column 5 does not exist
    }

    #[test]
    fn test_scale_identity() {
        let frame = marker_frame(6, 4, 2, 1);
        let scaled = scale(&frame, 1.0);
        assert_eq!(frame.values(), scaled.values());
    }

    #[test]
    fn test_scale_doubles_dimensions() {
        let frame = marker_frame(4, 3, 0, 0);
        let scaled = scale(&frame, 2.0);
        assert_eq!((scaled.width(), scaled.height()), (8, 6));
    }

    #[test]
    fn test_place_offsets_and_fills_invalid() {
        let frame = marker_frame(3, 3, 1, 1);
        let canvas = place(&frame, 4, 2, 10, 8);
        assert_eq!(canvas.get(5, 3), Some(1200.0));
        assert_eq!(canvas.get(0, 0), None);
        assert_eq!(canvas.get(9, 7), None);
    }

    #[test]
    fn test_place_clips_negative_offsets() {
        let frame = marker_frame(3, 3, 0, 0);
        let canvas = place(&frame, -2, -2, 4, 4);
        // Only the bottom-right cell of the frame remains visible
        assert_eq!(canvas.get(0, 0), Some(1000.0));
        assert_eq!(canvas.get(1, 1), None);
    }
}
