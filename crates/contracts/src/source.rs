//! DepthSource trait - depth data source abstraction
//!
//! Defines the unified polling interface for depth sources, decoupling the
//! render loop from concrete sensor implementations. Real device-backed and
//! synthetic sources implement the same API; the variant is chosen at
//! construction, never probed at call time.

use crate::{ContractError, DepthFrame};
use bytes::Bytes;

/// Depth data source trait
///
/// # Contract
///
/// `poll` must not block longer than one refresh interval and must return a
/// best-effort frame even on partial sensor failure: failed cells are marked
/// invalid in the frame, a completely failed readout yields an all-invalid
/// frame. A poll is never an error.
///
/// At most one live source may exist per physical device; exclusivity is
/// enforced at construction by the device-claim mechanism of the source
/// implementation, not by runtime locking in consumers.
pub trait DepthSource: Send {
    /// Human-readable source name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Native sensor resolution (width, height)
    fn resolution(&self) -> (u32, u32);

    /// Fetch the next depth frame (best effort, see trait docs)
    fn poll(&mut self) -> DepthFrame;
}

impl core::fmt::Debug for dyn DepthSource + '_ {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DepthSource")
            .field("name", &self.name())
            .field("resolution", &self.resolution())
            .finish_non_exhaustive()
    }
}

/// A single raw readout from a physical depth device.
///
/// Cells are row-major `u16` millimeter distances in native byte order,
/// `0` meaning invalid (the common depth-camera convention).
#[derive(Debug, Clone)]
pub struct RawDepthGrab {
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

/// Low-level driver handle supplied by the embedding application.
///
/// The physical driver itself is an external collaborator; this trait is the
/// narrow seam the pipeline consumes it through. Implementations may block
/// briefly inside `grab`, but should respect the refresh interval.
pub trait FrameGrabber: Send {
    /// Stable identifier of the physical device (claim key)
    fn device_id(&self) -> &str;

    /// Native device resolution (width, height)
    fn resolution(&self) -> (u32, u32);

    /// Read one raw depth frame from the device
    ///
    /// # Errors
    /// Returns [`ContractError::HardwareUnavailable`] when the readout
    /// failed; the adapter degrades this to an all-invalid frame.
    fn grab(&mut self) -> Result<RawDepthGrab, ContractError>;
}
