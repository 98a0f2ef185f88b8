//! Named colormaps for the depth→color mapping
//!
//! Each map takes a normalized depth t ∈ [0, 1] and returns RGBA8. The 8-bit
//! quantization here is the only rounding the render pipeline performs.

use contracts::ColorMapId;

/// Sample a colormap at t (clamped into [0, 1]).
pub fn sample(cmap: ColorMapId, t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    match cmap {
        ColorMapId::Greys => greys(t),
        ColorMapId::Turbo => turbo(t),
        ColorMapId::GistEarth => gist_earth(t),
    }
}

/// Linear grayscale ramp, shallow = dark, deep = bright.
/// Tops out just below pure white, which stays reserved for background.
fn greys(t: f32) -> [u8; 4] {
    let g = (t * 245.0).round() as u8;
    [g, g, g, 255]
}

/// Turbo colormap: perceptually uniform rainbow.
///
/// Polynomial approximation of the Google AI turbo map.
fn turbo(t: f32) -> [u8; 4] {
    let r = (0.13572138
        + t * (4.6153926 + t * (-42.66032 + t * (132.13108 + t * (-152.54825 + t * 59.28144)))))
        .clamp(0.0, 1.0);
    let g = (0.09140261
        + t * (2.19418 + t * (4.84296 + t * (-14.18503 + t * (4.27805 + t * 2.53377)))))
        .clamp(0.0, 1.0);
    let b = (0.1066733
        + t * (12.64194 + t * (-60.58204 + t * (109.99648 + t * (-82.52904 + t * 20.43388)))))
        .clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8, 255]
}

/// Terrain-style map: deep water blues through greens to highland browns
/// and white, piecewise-linear between anchor stops.
fn gist_earth(t: f32) -> [u8; 4] {
    const STOPS: [(f32, [u8; 3]); 7] = [
        (0.00, [0, 0, 0]),
        (0.15, [18, 48, 119]),
        (0.35, [36, 118, 132]),
        (0.55, [83, 153, 84]),
        (0.75, [179, 165, 98]),
        (0.90, [211, 188, 160]),
        (1.00, [253, 250, 250]),
    ];

    let mut lo = STOPS[0];
    for hi in STOPS.iter().skip(1) {
        if t <= hi.0 {
            let span = hi.0 - lo.0;
            let f = if span > 0.0 { (t - lo.0) / span } else { 0.0 };
            let mix = |a: u8, b: u8| (a as f32 + f * (b as f32 - a as f32)).round() as u8;
            return [
                mix(lo.1[0], hi.1[0]),
                mix(lo.1[1], hi.1[1]),
                mix(lo.1[2], hi.1[2]),
                255,
            ];
        }
        lo = *hi;
    }
    [STOPS[6].1[0], STOPS[6].1[1], STOPS[6].1[2], 255]
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::BACKGROUND_RGBA;

    #[test]
    fn test_greys_endpoints() {
        assert_eq!(sample(ColorMapId::Greys, 0.0), [0, 0, 0, 255]);
        assert_eq!(sample(ColorMapId::Greys, 1.0), [245, 245, 245, 255]);
    }

    #[test]
    fn test_out_of_range_t_clamps() {
        assert_eq!(
            sample(ColorMapId::Turbo, -1.0),
            sample(ColorMapId::Turbo, 0.0)
        );
        assert_eq!(
            sample(ColorMapId::Turbo, 2.0),
            sample(ColorMapId::Turbo, 1.0)
        );
    }

    #[test]
    fn test_turbo_ends_blue_to_red() {
        let near = sample(ColorMapId::Turbo, 0.0);
        let far = sample(ColorMapId::Turbo, 1.0);
        assert!(near[2] > near[0], "t=0 should be blue-dominant: {near:?}");
        assert!(far[0] > far[2], "t=1 should be red-dominant: {far:?}");
    }

    #[test]
    fn test_no_map_endpoint_equals_background() {
        // White is reserved for invalid/out-of-range cells
        for cmap in [ColorMapId::GistEarth, ColorMapId::Greys, ColorMapId::Turbo] {
            for t in [0.0, 1.0] {
                assert_ne!(sample(cmap, t), BACKGROUND_RGBA, "{cmap:?} at t={t}");
            }
        }
    }
}
