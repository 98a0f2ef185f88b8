//! ProfileUpdate - the control surface
//!
//! One variant per calibration field, applied as a single atomic mutation.
//! This is the message type the interactive surface (sliders, API, whatever
//! sits outside) speaks; the session validates through the profile setters
//! and rejects anything that would violate an invariant.

use contracts::{CalibrationProfile, ColorMapId, ContractError, OverlayRegion};
use serde::{Deserialize, Serialize};

/// Single-field calibration mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileUpdate {
    RotAngle(f64),
    XLim(u32, u32),
    YLim(u32, u32),
    XPos(i32),
    YPos(i32),
    ScaleFactor(f64),
    ZRange(f64, f64),
    CanvasSize(u32, u32),
    BoxSize(f64, f64),
    Contours(bool),
    NContours(u32),
    Cmap(ColorMapId),
    Legend(Option<OverlayRegion>),
    ProfileArea(Option<OverlayRegion>),
    HotArea(Option<OverlayRegion>),
}

impl ProfileUpdate {
    /// Apply this mutation to a profile.
    ///
    /// # Errors
    /// [`ContractError::InvalidProfileField`] when the value violates the
    /// field's invariant; the profile is left untouched.
    pub fn apply(&self, profile: &mut CalibrationProfile) -> Result<(), ContractError> {
        match *self {
            Self::RotAngle(deg) => profile.set_rot_angle(deg),
            Self::XLim(min, max) => profile.set_x_lim((min, max)),
            Self::YLim(min, max) => profile.set_y_lim((min, max)),
            Self::XPos(pos) => {
                profile.set_x_pos(pos);
                Ok(())
            }
            Self::YPos(pos) => {
                profile.set_y_pos(pos);
                Ok(())
            }
            Self::ScaleFactor(scale) => profile.set_scale_factor(scale),
            Self::ZRange(min, max) => profile.set_z_range((min, max)),
            Self::CanvasSize(w, h) => profile.set_canvas_size(w, h),
            Self::BoxSize(w, h) => profile.set_box_size(w, h),
            Self::Contours(on) => {
                profile.set_contours(on);
                Ok(())
            }
            Self::NContours(n) => {
                profile.set_n_contours(n);
                Ok(())
            }
            Self::Cmap(cmap) => {
                profile.set_cmap(cmap);
                Ok(())
            }
            Self::Legend(region) => {
                profile.set_legend(region);
                Ok(())
            }
            Self::ProfileArea(region) => {
                profile.set_profile_area(region);
                Ok(())
            }
            Self::HotArea(region) => {
                profile.set_hot_area(region);
                Ok(())
            }
        }
    }

    /// Name of the field this update touches (for logging)
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::RotAngle(_) => "rot_angle",
            Self::XLim(_, _) => "x_lim",
            Self::YLim(_, _) => "y_lim",
            Self::XPos(_) => "x_pos",
            Self::YPos(_) => "y_pos",
            Self::ScaleFactor(_) => "scale_factor",
            Self::ZRange(_, _) => "z_range",
            Self::CanvasSize(_, _) => "canvas_size",
            Self::BoxSize(_, _) => "box_size",
            Self::Contours(_) => "contours",
            Self::NContours(_) => "n_contours",
            Self::Cmap(_) => "cmap",
            Self::Legend(_) => "legend",
            Self::ProfileArea(_) => "profile_area",
            Self::HotArea(_) => "hot_area",
        }
    }
}
