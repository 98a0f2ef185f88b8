//! CalibrationProfile - the persisted calibration record
//!
//! Single source of truth for the sensor→projector mapping. Mutations go
//! through per-field setters that validate before committing, so a profile
//! that exists is always in a renderable state.

use serde::{Deserialize, Serialize};

/// Record version (bumped when calibration parameters are introduced / removed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProfileVersion {
    #[default]
    V1,
}

/// Named colormap for the depth→color mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMapId {
    /// Terrain-style map: deep blues through greens to browns and white
    #[default]
    GistEarth,
    /// Linear grayscale ramp
    Greys,
    /// Perceptually uniform rainbow
    Turbo,
}

/// Auxiliary overlay placement (legend, profile strip, hot area).
/// Carried through persistence untouched; the transform never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRegion {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

/// The complete sensor→projector calibration parameter set.
///
/// Geometry fields drive the rotate→crop→scale→place stages, `z_range` and
/// the appearance knobs drive the depth→color stage. Every field is covered
/// by the persisted record; unknown extra fields in a record are ignored on
/// load, missing required ones fail it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Record version
    #[serde(default)]
    version: ProfileVersion,

    /// Rotation of the sensor frame relative to the projector frame,
    /// degrees, normalized into [-180, 180)
    rot_angle: f64,

    /// Horizontal crop window in sensor pixels, `min < max`
    x_lim: (u32, u32),

    /// Vertical crop window in sensor pixels, `min < max`
    y_lim: (u32, u32),

    /// Placement of the cropped frame on the projector canvas
    x_pos: i32,
    y_pos: i32,

    /// Sensor-pixel → projector-pixel scale, `> 0`
    scale_factor: f64,

    /// Depth window (min, max) in millimeters mapped to the full color range
    z_range: (f64, f64),

    /// Projector canvas resolution
    canvas_width: u32,
    canvas_height: u32,

    /// Physical sandbox footprint in millimeters - display-scale bookkeeping
    /// only, never part of the transform math
    box_width: f64,
    box_height: f64,

    /// Draw iso-depth contour lines over the colorized output
    contours: bool,

    /// Number of equally spaced contour levels inside `z_range`
    n_contours: u32,

    /// Colormap for the depth→color mapping
    cmap: ColorMapId,

    /// Overlay regions, passed through for external consumers
    #[serde(default)]
    legend: Option<OverlayRegion>,
    #[serde(default)]
    profile_area: Option<OverlayRegion>,
    #[serde(default)]
    hot_area: Option<OverlayRegion>,
}

/// Fold an angle into [-180, 180) degrees.
fn normalize_degrees(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::defaults()
    }
}

impl CalibrationProfile {
    /// Deterministic baseline used before any load: no rotation, full-frame
    /// crop for the 512×424 synthetic grid, unit scale, conservative depth
    /// window. Invariant-valid, so a fresh session renders before any
    /// calibration step.
    pub fn defaults() -> Self {
        Self {
            version: ProfileVersion::V1,
            rot_angle: 0.0,
            x_lim: (0, 512),
            y_lim: (0, 424),
            x_pos: 0,
            y_pos: 0,
            scale_factor: 1.0,
            z_range: (700.0, 1500.0),
            canvas_width: 1280,
            canvas_height: 800,
            box_width: 1000.0,
            box_height: 800.0,
            contours: true,
            n_contours: 10,
            cmap: ColorMapId::GistEarth,
            legend: None,
            profile_area: None,
            hot_area: None,
        }
    }

    // ===== Getters =====

    pub fn version(&self) -> ProfileVersion {
        self.version
    }

    pub fn rot_angle(&self) -> f64 {
        self.rot_angle
    }

    pub fn x_lim(&self) -> (u32, u32) {
        self.x_lim
    }

    pub fn y_lim(&self) -> (u32, u32) {
        self.y_lim
    }

    pub fn x_pos(&self) -> i32 {
        self.x_pos
    }

    pub fn y_pos(&self) -> i32 {
        self.y_pos
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn z_range(&self) -> (f64, f64) {
        self.z_range
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn box_size(&self) -> (f64, f64) {
        (self.box_width, self.box_height)
    }

    pub fn contours(&self) -> bool {
        self.contours
    }

    pub fn n_contours(&self) -> u32 {
        self.n_contours
    }

    pub fn cmap(&self) -> ColorMapId {
        self.cmap
    }

    pub fn legend(&self) -> Option<OverlayRegion> {
        self.legend
    }

    pub fn profile_area(&self) -> Option<OverlayRegion> {
        self.profile_area
    }

    pub fn hot_area(&self) -> Option<OverlayRegion> {
        self.hot_area
    }

    // ===== Setters (validate, then commit; failure leaves the profile unchanged) =====

    /// Set the rotation angle. Any finite angle is accepted and normalized
    /// into [-180, 180).
    pub fn set_rot_angle(&mut self, degrees: f64) -> Result<(), crate::ContractError> {
        if !degrees.is_finite() {
            return Err(crate::ContractError::invalid_field(
                "rot_angle",
                format!("must be finite, got {degrees}"),
            ));
        }
        self.rot_angle = normalize_degrees(degrees);
        Ok(())
    }

    pub fn set_x_lim(&mut self, lim: (u32, u32)) -> Result<(), crate::ContractError> {
        check_lim("x_lim", lim)?;
        self.x_lim = lim;
        Ok(())
    }

    pub fn set_y_lim(&mut self, lim: (u32, u32)) -> Result<(), crate::ContractError> {
        check_lim("y_lim", lim)?;
        self.y_lim = lim;
        Ok(())
    }

    pub fn set_x_pos(&mut self, pos: i32) {
        self.x_pos = pos;
    }

    pub fn set_y_pos(&mut self, pos: i32) {
        self.y_pos = pos;
    }

    pub fn set_scale_factor(&mut self, scale: f64) -> Result<(), crate::ContractError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(crate::ContractError::invalid_field(
                "scale_factor",
                format!("must be a positive finite number, got {scale}"),
            ));
        }
        self.scale_factor = scale;
        Ok(())
    }

    pub fn set_z_range(&mut self, range: (f64, f64)) -> Result<(), crate::ContractError> {
        let (min, max) = range;
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(crate::ContractError::invalid_field(
                "z_range",
                format!("requires finite min < max, got ({min}, {max})"),
            ));
        }
        self.z_range = range;
        Ok(())
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> Result<(), crate::ContractError> {
        if width == 0 || height == 0 {
            return Err(crate::ContractError::invalid_field(
                "canvas_size",
                format!("must be non-zero, got {width}x{height}"),
            ));
        }
        self.canvas_width = width;
        self.canvas_height = height;
        Ok(())
    }

    pub fn set_box_size(&mut self, width: f64, height: f64) -> Result<(), crate::ContractError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(crate::ContractError::invalid_field(
                "box_size",
                format!("must be positive finite millimeters, got {width}x{height}"),
            ));
        }
        self.box_width = width;
        self.box_height = height;
        Ok(())
    }

    pub fn set_contours(&mut self, enabled: bool) {
        self.contours = enabled;
    }

    pub fn set_n_contours(&mut self, n: u32) {
        self.n_contours = n;
    }

    pub fn set_cmap(&mut self, cmap: ColorMapId) {
        self.cmap = cmap;
    }

    pub fn set_legend(&mut self, region: Option<OverlayRegion>) {
        self.legend = region;
    }

    pub fn set_profile_area(&mut self, region: Option<OverlayRegion>) {
        self.profile_area = region;
    }

    pub fn set_hot_area(&mut self, region: Option<OverlayRegion>) {
        self.hot_area = region;
    }

    /// Re-check every invariant. Loaders call this after deserialization so
    /// their callers never receive a semantically invalid profile.
    pub fn validate(&self) -> Result<(), crate::ContractError> {
        if !self.rot_angle.is_finite() || self.rot_angle < -180.0 || self.rot_angle >= 180.0 {
            return Err(crate::ContractError::invalid_field(
                "rot_angle",
                format!("must lie in [-180, 180), got {}", self.rot_angle),
            ));
        }
        check_lim("x_lim", self.x_lim)?;
        check_lim("y_lim", self.y_lim)?;
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(crate::ContractError::invalid_field(
                "scale_factor",
                format!("must be a positive finite number, got {}", self.scale_factor),
            ));
        }
        let (z_min, z_max) = self.z_range;
        if !z_min.is_finite() || !z_max.is_finite() || z_min >= z_max {
            return Err(crate::ContractError::invalid_field(
                "z_range",
                format!("requires finite min < max, got ({z_min}, {z_max})"),
            ));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(crate::ContractError::invalid_field(
                "canvas_size",
                format!(
                    "must be non-zero, got {}x{}",
                    self.canvas_width, self.canvas_height
                ),
            ));
        }
        if !self.box_width.is_finite()
            || !self.box_height.is_finite()
            || self.box_width <= 0.0
            || self.box_height <= 0.0
        {
            return Err(crate::ContractError::invalid_field(
                "box_size",
                format!(
                    "must be positive finite millimeters, got {}x{}",
                    self.box_width, self.box_height
                ),
            ));
        }
        Ok(())
    }
}

fn check_lim(field: &str, (min, max): (u32, u32)) -> Result<(), crate::ContractError> {
    if min >= max {
        return Err(crate::ContractError::invalid_field(
            field,
            format!("requires min < max, got ({min}, {max})"),
        ));
    }
    Ok(())
}
