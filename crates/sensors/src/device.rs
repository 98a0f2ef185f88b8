//! Device-backed depth source
//!
//! Adapts an external [`FrameGrabber`] driver handle to the [`DepthSource`]
//! seam, and enforces single ownership of the physical device: the claim is
//! taken at construction and held until the source is dropped, so a second
//! concurrent source for the same hardware is refused outright instead of
//! being arbitrated at runtime.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Instant;

use contracts::{ContractError, DepthFrame, DepthSource, FrameGrabber, RawDepthGrab};
use tracing::{debug, warn};

use crate::metrics::SourceMetrics;

/// Process-wide set of claimed device ids
fn claim_registry() -> &'static Mutex<HashSet<String>> {
    static CLAIMS: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    CLAIMS.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Exclusive ownership token for one physical depth device.
///
/// Acquiring a claim for an id that is already claimed fails with
/// [`ContractError::HardwareExclusivity`]. The claim is released when the
/// token is dropped, on every exit path.
#[derive(Debug)]
pub struct DeviceClaim {
    device_id: String,
}

impl DeviceClaim {
    /// Claim a device id for this process
    ///
    /// # Errors
    /// [`ContractError::HardwareExclusivity`] when the id is already claimed.
    pub fn acquire(device_id: &str) -> Result<Self, ContractError> {
        let mut claims = claim_registry()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !claims.insert(device_id.to_string()) {
            return Err(ContractError::HardwareExclusivity {
                device: device_id.to_string(),
            });
        }

        debug!(device = %device_id, "device claimed");
        Ok(Self {
            device_id: device_id.to_string(),
        })
    }

    /// The claimed device id
    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

impl Drop for DeviceClaim {
    fn drop(&mut self) {
        let mut claims = claim_registry()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        claims.remove(&self.device_id);
        debug!(device = %self.device_id, "device claim released");
    }
}

/// Depth source backed by a physical device driver.
///
/// Raw grabs use the common depth-camera convention: `u16` millimeters,
/// `0` = invalid. Failed readouts degrade to all-invalid frames; the first
/// failure is logged at warn level, repeats at debug.
pub struct DeviceDepthSource {
    grabber: Box<dyn FrameGrabber>,
    _claim: DeviceClaim,
    name: String,
    frame_id: u64,
    started: Instant,
    failure_logged: bool,
    metrics: Arc<SourceMetrics>,
}

impl std::fmt::Debug for DeviceDepthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceDepthSource")
            .field("name", &self.name)
            .field("frame_id", &self.frame_id)
            .field("failure_logged", &self.failure_logged)
            .finish_non_exhaustive()
    }
}

impl DeviceDepthSource {
    /// Open the device behind `grabber`, claiming it for this process
    ///
    /// # Errors
    /// [`ContractError::HardwareExclusivity`] when another live source
    /// already owns the device.
    pub fn open(grabber: Box<dyn FrameGrabber>) -> Result<Self, ContractError> {
        let claim = DeviceClaim::acquire(grabber.device_id())?;
        let name = format!("device:{}", grabber.device_id());
        Ok(Self {
            grabber,
            _claim: claim,
            name,
            frame_id: 0,
            started: Instant::now(),
            failure_logged: false,
            metrics: Arc::new(SourceMetrics::new()),
        })
    }

    /// Poll metrics handle
    pub fn metrics(&self) -> Arc<SourceMetrics> {
        self.metrics.clone()
    }

    fn convert(&self, grab: RawDepthGrab, frame_id: u64, timestamp: f64) -> DepthFrame {
        let (width, height) = (grab.width, grab.height);
        let expected = (width as usize) * (height as usize) * 2;
        if grab.data.len() != expected {
            warn!(
                source = %self.name,
                got = grab.data.len(),
                expected,
                "raw grab has unexpected length, degrading to invalid frame"
            );
            return DepthFrame::all_invalid(width, height, frame_id, timestamp);
        }

        let cells: Vec<u16> = bytemuck::pod_collect_to_vec(grab.data.as_ref());
        let values = cells
            .into_iter()
            .map(|mm| if mm == 0 { f32::NAN } else { f32::from(mm) })
            .collect();
        DepthFrame::new(width, height, frame_id, timestamp, values)
    }
}

impl DepthSource for DeviceDepthSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolution(&self) -> (u32, u32) {
        self.grabber.resolution()
    }

    fn poll(&mut self) -> DepthFrame {
        self.frame_id += 1;
        let frame_id = self.frame_id;
        let timestamp = self.started.elapsed().as_secs_f64();
        self.metrics.record_poll();

        match self.grabber.grab() {
            Ok(grab) => self.convert(grab, frame_id, timestamp),
            Err(e) => {
                if !self.failure_logged {
                    self.failure_logged = true;
                    warn!(source = %self.name, error = %e, "device readout failed, degrading");
                } else {
                    debug!(source = %self.name, error = %e, "device readout failed");
                }
                self.metrics.record_degraded();
                let (width, height) = self.grabber.resolution();
                DepthFrame::all_invalid(width, height, frame_id, timestamp)
            }
        }
    }
}
