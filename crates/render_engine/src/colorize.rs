//! Radiometric stages: depth→color mapping and contour overlay

use contracts::{CalibrationProfile, DepthFrame, BACKGROUND_RGBA};

use crate::colormap;

/// Contour lines paint black over the colorized output
const CONTOUR_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Map a depth canvas to RGBA8.
///
/// Valid cells inside `z_range` normalize to [0, 1] and go through the
/// profile colormap; invalid cells and depths outside the window render as
/// the background color, never as a colormap endpoint.
pub fn colorize(canvas: &DepthFrame, profile: &CalibrationProfile) -> Vec<u8> {
    let (z_min, z_max) = profile.z_range();
    let span = z_max - z_min;
    let cmap = profile.cmap();

    let mut rgba = Vec::with_capacity(canvas.values().len() * 4);
    for &v in canvas.values() {
        if v.is_nan() || (v as f64) < z_min || (v as f64) > z_max {
            rgba.extend_from_slice(&BACKGROUND_RGBA);
        } else {
            let t = ((v as f64 - z_min) / span) as f32;
            rgba.extend_from_slice(&colormap::sample(cmap, t));
        }
    }
    rgba
}

/// Overlay `n_contours` equally spaced iso-depth lines.
///
/// Levels sit at `z_min + i·span/(n+1)`, i = 1..=n, so no line coincides
/// with the clip boundary. A cell is part of a line when it and its right or
/// down neighbor fall in different level bands; only cells inside the valid
/// depth range are ever painted.
pub fn overlay_contours(rgba: &mut [u8], canvas: &DepthFrame, profile: &CalibrationProfile) {
    let n = profile.n_contours();
    if !profile.contours() || n == 0 {
        return;
    }

    let (z_min, z_max) = profile.z_range();
    let span = z_max - z_min;
    let bands = (n + 1) as f64;

    let band_of = |x: u32, y: u32| -> Option<u32> {
        let v = canvas.get(x, y)? as f64;
        if v < z_min || v > z_max {
            return None;
        }
        // Cells exactly at z_max fold into the top band
        Some(((((v - z_min) / span) * bands) as u32).min(n))
    };

    let (width, height) = (canvas.width(), canvas.height());
    for y in 0..height {
        for x in 0..width {
            let Some(band) = band_of(x, y) else { continue };

            let right = x + 1 < width && band_of(x + 1, y).is_some_and(|b| b != band);
            let down = y + 1 < height && band_of(x, y + 1).is_some_and(|b| b != band);
            if right || down {
                let i = ((y as usize) * (width as usize) + (x as usize)) * 4;
                rgba[i..i + 4].copy_from_slice(&CONTOUR_RGBA);
            }
        }
    }
}
