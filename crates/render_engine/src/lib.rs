//! # Render Engine
//!
//! The pure transform pipeline from raw depth frames to projector frames.
//!
//! `render` applies the calibration profile in a fixed stage order:
//!
//! 1. rotate by `rot_angle` about the frame center
//! 2. crop to `x_lim × y_lim`
//! 3. scale by `scale_factor`
//! 4. place at `(x_pos, y_pos)` on the projector canvas
//! 5. map depth to color through `z_range` and `cmap`
//! 6. overlay iso-depth contours
//!
//! Resampling is bilinear in every stage (rotation and scaling), so the
//! mapping is deterministic across runs: identical inputs produce
//! bit-identical output, the only rounding being the 8-bit colormap
//! quantization. `rot_angle = 0` and `scale_factor = 1` are exact
//! identities.
//!
//! The engine holds no state; degenerate parameters are rejected at the
//! profile boundary, so `render` always receives a valid profile.

mod colorize;
mod colormap;
mod geometry;

pub use colormap::sample as sample_colormap;

use bytes::Bytes;
use contracts::{CalibrationProfile, ColorFrame, DepthFrame};
use tracing::trace;

/// Transform one depth frame into a colorized projector frame.
pub fn render(frame: &DepthFrame, profile: &CalibrationProfile) -> ColorFrame {
    let rotated = geometry::rotate(frame, profile.rot_angle());
    let cropped = geometry::crop(&rotated, profile.x_lim(), profile.y_lim());
    let scaled = geometry::scale(&cropped, profile.scale_factor());

    let (canvas_width, canvas_height) = profile.canvas_size();
    let canvas = geometry::place(
        &scaled,
        profile.x_pos(),
        profile.y_pos(),
        canvas_width,
        canvas_height,
    );

    let mut rgba = colorize::colorize(&canvas, profile);
    colorize::overlay_contours(&mut rgba, &canvas, profile);

    trace!(
        frame_id = frame.frame_id,
        sensor = format!("{}x{}", frame.width(), frame.height()),
        scaled = format!("{}x{}", scaled.width(), scaled.height()),
        canvas = format!("{canvas_width}x{canvas_height}"),
        "frame rendered"
    );

    ColorFrame::new(
        canvas_width,
        canvas_height,
        frame.frame_id,
        frame.timestamp,
        Bytes::from(rgba),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ColorMapId, BACKGROUND_RGBA};

    fn flat_frame(width: u32, height: u32, depth: f32) -> DepthFrame {
        DepthFrame::new(width, height, 1, 0.0, vec![depth; (width * height) as usize])
    }

    /// Profile sized for a small synthetic frame
    fn small_profile(width: u32, height: u32) -> CalibrationProfile {
        let mut p = CalibrationProfile::defaults();
        p.set_x_lim((0, width)).unwrap();
        p.set_y_lim((0, height)).unwrap();
        p.set_canvas_size(width * 2, height * 2).unwrap();
        p.set_z_range((900.0, 1300.0)).unwrap();
        p.set_cmap(ColorMapId::Greys);
        p.set_contours(false);
        p
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut values = vec![1000.0f32; 100];
        values[37] = 1250.0;
        values[62] = f32::NAN;
        let frame = DepthFrame::new(10, 10, 3, 0.25, values);

        let mut profile = small_profile(10, 10);
        profile.set_rot_angle(7.3).unwrap();
        profile.set_scale_factor(1.25).unwrap();
        profile.set_contours(true);
        profile.set_n_contours(4);

        let a = render(&frame, &profile);
        let b = render(&frame, &profile);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_marker_lands_at_offset_position() {
        // Known marker, identity rotation/scale, full crop: the marker must
        // appear at exactly (px + x_pos, py + y_pos) on the canvas
        let (px, py) = (3u32, 4u32);
        let mut values = vec![1000.0f32; 100];
        values[(py * 10 + px) as usize] = 1200.0;
        let frame = DepthFrame::new(10, 10, 1, 0.0, values);

        let mut profile = small_profile(10, 10);
        profile.set_x_pos(5);
        profile.set_y_pos(6);

        let out = render(&frame, &profile);

        // 1200 in (900, 1300) → t = 0.75, 1000 → t = 0.25
        let marker = sample_colormap(ColorMapId::Greys, 0.75);
        let field = sample_colormap(ColorMapId::Greys, 0.25);
        assert_eq!(out.pixel(px + 5, py + 6), Some(marker));
        assert_eq!(out.pixel(px + 4, py + 6), Some(field));
        assert_eq!(out.pixel(0, 0), Some(BACKGROUND_RGBA)); // uncovered canvas
    }

    #[test]
    fn test_default_profile_renders_full_canvas() {
        // Default session scenario: defaults against a dummy-sized frame
        let frame = flat_frame(512, 424, 1100.0);
        let profile = CalibrationProfile::defaults();
        let out = render(&frame, &profile);

        let (cw, ch) = profile.canvas_size();
        assert_eq!((out.width(), out.height()), (cw, ch));

        // Covered region is colormap everywhere, uncovered is background
        let covered = out.pixel(0, 0).unwrap();
        assert_ne!(covered, BACKGROUND_RGBA);
        assert_eq!(out.pixel(cw - 1, ch - 1), Some(BACKGROUND_RGBA));
        for y in [0u32, 200, 423] {
            for x in [0u32, 256, 511] {
                assert_ne!(out.pixel(x, y).unwrap(), BACKGROUND_RGBA, "at ({x},{y})");
            }
        }
    }

    #[test]
    fn test_all_invalid_frame_renders_all_background() {
        let frame = DepthFrame::all_invalid(10, 10, 1, 0.0);
        let profile = small_profile(10, 10);
        let out = render(&frame, &profile);

        for y in 0..out.height() {
            for x in 0..out.width() {
                assert_eq!(out.pixel(x, y), Some(BACKGROUND_RGBA));
            }
        }
    }

    #[test]
    fn test_crop_then_place_shifts_content() {
        let mut values = vec![1000.0f32; 100];
        values[55] = 1200.0; // (5, 5)
        let frame = DepthFrame::new(10, 10, 1, 0.0, values);

        let mut profile = small_profile(10, 10);
        profile.set_x_lim((4, 8)).unwrap();
        profile.set_y_lim((4, 8)).unwrap();

        let out = render(&frame, &profile);
        let marker = sample_colormap(ColorMapId::Greys, 0.75);
        // Marker moved from (5,5) to (1,1) by the crop
        assert_eq!(out.pixel(1, 1), Some(marker));
    }
}
