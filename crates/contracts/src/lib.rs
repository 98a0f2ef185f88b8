//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Coordinate Model
//! - Sensor space: row-major depth grid, origin top-left, distances in millimeters
//! - Projector space: row-major RGBA canvas, origin top-left
//! - Timestamps are seconds since source start (f64); `frame_id` is a per-source counter

mod color_frame;
mod depth_frame;
mod error;
mod profile;
mod sink;
mod source;

pub use color_frame::*;
pub use depth_frame::*;
pub use error::*;
pub use profile::*;
pub use sink::*;
pub use source::{DepthSource, FrameGrabber, RawDepthGrab};
