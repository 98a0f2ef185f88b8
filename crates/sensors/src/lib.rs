//! # Sensors
//!
//! Depth source implementations behind the [`contracts::DepthSource`] seam.
//!
//! Two variants, selected at construction:
//! - [`SyntheticDepthSource`] - deterministic software surface, used when no
//!   physical device is present (and in every test)
//! - [`DeviceDepthSource`] - adapts an external [`contracts::FrameGrabber`]
//!   driver handle; construction claims the device, so a second live source
//!   for the same hardware fails up front instead of racing at runtime
//!
//! Plus [`SmoothedSource`], a decorator applying temporal averaging and a
//! Gaussian blur to any inner source.

mod device;
mod metrics;
mod smoothing;
mod synthetic;

pub use device::{DeviceClaim, DeviceDepthSource};
pub use metrics::{SourceMetrics, SourceMetricsSnapshot};
pub use smoothing::SmoothedSource;
pub use synthetic::{SyntheticConfig, SyntheticDepthSource};

use contracts::{ContractError, DepthSource, FrameGrabber};
use tracing::warn;

/// Open a device-backed source, degrading to the synthetic surface when the
/// driver reports no hardware.
///
/// `grabber` is the embedding application's attempt to hand over a driver
/// handle. [`ContractError::HardwareUnavailable`] is the non-fatal case:
/// logged once, synthetic source returned. Everything else (notably
/// [`ContractError::HardwareExclusivity`] from the claim) propagates.
pub fn open_device_or_synthetic(
    grabber: Result<Box<dyn FrameGrabber>, ContractError>,
    synthetic: SyntheticConfig,
) -> Result<Box<dyn DepthSource>, ContractError> {
    match grabber {
        Ok(grabber) => Ok(Box::new(DeviceDepthSource::open(grabber)?)),
        Err(ContractError::HardwareUnavailable { device, message }) => {
            warn!(
                device = %device,
                reason = %message,
                "no depth hardware available, using the synthetic source"
            );
            Ok(Box::new(SyntheticDepthSource::new(synthetic)))
        }
        Err(e) => Err(e),
    }
}
