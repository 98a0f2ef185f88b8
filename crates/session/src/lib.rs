//! # Session
//!
//! The interactive calibration session: owns the profile, the depth source
//! and the output sink, and drives the render loop while an operator tunes
//! parameters.
//!
//! Lifecycle is a three-state machine:
//!
//! ```text
//! Idle --start()--> Live --close()--> Closed
//! ```
//!
//! While `Live`, one task re-renders on a fixed timer tick or on any
//! parameter mutation, whichever comes first. Each render works on an
//! immutable profile snapshot taken at trigger time, so a mutation arriving
//! mid-render lands in the next frame instead of tearing the current one.
//! Closing the session stops the sink and releases the source (and with it
//! any device claim) on the transition itself.

mod metrics;
mod session;
mod update;

pub use metrics::{SessionMetrics, SessionMetricsSnapshot};
pub use session::{CalibrationSession, SessionState, DEFAULT_REFRESH_INTERVAL};
pub use update::ProfileUpdate;
