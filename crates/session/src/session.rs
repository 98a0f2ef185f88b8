//! CalibrationSession - state machine and render loop

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use contracts::{CalibrationProfile, ContractError, DepthSource};
use dispatcher::SinkHandle;
use profile_store::ProfileStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use crate::metrics::SessionMetrics;
use crate::update::ProfileUpdate;

/// Default render loop interval
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Profile loaded or defaulted, no render issued yet
    Idle,
    /// Render loop active
    Live,
    /// Terminal; mutations still accepted but never rendered
    Closed,
}

/// Interactive calibration session.
///
/// Owns the profile and, until `start` hands them to the render task, the
/// depth source and the sink. There is no ambient registry: whoever holds
/// the session holds the pipeline.
pub struct CalibrationSession {
    state: SessionState,
    profile: CalibrationProfile,
    refresh_interval: Duration,

    // Moved into the render task on start()
    source: Option<Box<dyn DepthSource>>,
    sink: Option<SinkHandle>,

    profile_tx: Option<watch::Sender<CalibrationProfile>>,
    render_task: Option<JoinHandle<()>>,
    metrics: Arc<SessionMetrics>,
}

impl CalibrationSession {
    /// Create a session in `Idle` with an explicit source and sink
    pub fn new(
        profile: CalibrationProfile,
        source: Box<dyn DepthSource>,
        sink: SinkHandle,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            profile,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            source: Some(source),
            sink: Some(sink),
            profile_tx: None,
            render_task: None,
            metrics: Arc::new(SessionMetrics::new()),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// Session metrics handle
    pub fn metrics(&self) -> Arc<SessionMetrics> {
        self.metrics.clone()
    }

    /// Set the render loop interval. Only allowed before the session goes
    /// live; the running loop keeps the interval it started with.
    pub fn set_refresh_interval(&mut self, interval: Duration) -> Result<(), ContractError> {
        if self.state != SessionState::Idle {
            return Err(ContractError::session(
                "refresh interval can only change while idle",
            ));
        }
        self.refresh_interval = interval;
        Ok(())
    }

    /// Start calibration: `Idle → Live`.
    ///
    /// Spawns the render task, which owns the source and sink for its whole
    /// life and renders on every timer tick or profile mutation.
    #[instrument(name = "session_start", skip(self))]
    pub fn start(&mut self) -> Result<(), ContractError> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Live => {
                return Err(ContractError::session("session is already live"));
            }
            SessionState::Closed => {
                return Err(ContractError::session("session is closed"));
            }
        }

        // Both are present in Idle by construction
        let source = self
            .source
            .take()
            .ok_or_else(|| ContractError::session("depth source missing"))?;
        let sink = self
            .sink
            .take()
            .ok_or_else(|| ContractError::session("sink missing"))?;

        let (tx, rx) = watch::channel(self.profile.clone());
        self.profile_tx = Some(tx);

        let interval = self.refresh_interval;
        let metrics = self.metrics.clone();
        self.render_task = Some(tokio::spawn(async move {
            render_loop(source, sink, rx, interval, metrics).await;
        }));

        self.state = SessionState::Live;
        info!(refresh_ms = self.refresh_interval.as_millis() as u64, "calibration started");
        Ok(())
    }

    /// Apply a single-field mutation.
    ///
    /// Accepted in every state; rendered only while `Live` (the new snapshot
    /// is pushed to the render task, which re-renders immediately).
    ///
    /// # Errors
    /// [`ContractError::InvalidProfileField`]: the mutation was rejected and
    /// the previous valid profile is retained, nothing partial committed.
    pub fn update(&mut self, update: ProfileUpdate) -> Result<(), ContractError> {
        if let Err(e) = update.apply(&mut self.profile) {
            self.metrics.record_rejected();
            warn!(field = update.field_name(), error = %e, "mutation rejected");
            return Err(e);
        }

        debug!(field = update.field_name(), "profile updated");
        if let Some(tx) = &self.profile_tx {
            // Receiver gone means the loop already exited; nothing to render
            let _ = tx.send(self.profile.clone());
        }
        Ok(())
    }

    /// Persist the current profile
    pub fn save(&self, path: &Path) -> Result<(), ContractError> {
        ProfileStore::save(&self.profile, path)?;
        info!(path = %path.display(), "profile saved");
        Ok(())
    }

    /// Replace the profile from a record on disk.
    ///
    /// On failure the session profile is unchanged.
    pub fn load(&mut self, path: &Path) -> Result<(), ContractError> {
        let profile = ProfileStore::load(path)?;
        self.profile = profile;
        if let Some(tx) = &self.profile_tx {
            let _ = tx.send(self.profile.clone());
        }
        info!(path = %path.display(), "profile loaded");
        Ok(())
    }

    /// Close calibration: `Live → Closed` (also reachable from `Idle`).
    ///
    /// Deterministically releases the source and sink on this transition:
    /// the watch channel closes, the render task runs its single exit path
    /// (stop sink, drop source), and this method awaits it. Closing an
    /// already closed session is a no-op.
    #[instrument(name = "session_close", skip(self))]
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }

        // Signal the render loop by closing the profile channel
        self.profile_tx = None;

        if let Some(task) = self.render_task.take() {
            if let Err(e) = task.await {
                error!(error = ?e, "render task panicked");
            }
        }

        // Never started: release the resources we still hold
        if let Some(sink) = self.sink.take() {
            sink.shutdown().await;
        }
        self.source = None;

        self.state = SessionState::Closed;
        info!("calibration closed");
    }
}

/// The render loop task.
///
/// Renders on whichever fires first: the periodic tick or a profile
/// mutation. Every render clones the profile snapshot current at trigger
/// time. Exits when the session drops the watch sender, then stops the sink
/// and drops the source - the one exit path, taken on every shutdown,
/// including session drop mid-render.
async fn render_loop(
    mut source: Box<dyn DepthSource>,
    sink: SinkHandle,
    mut profile_rx: watch::Receiver<CalibrationProfile>,
    interval: Duration,
    metrics: Arc<SessionMetrics>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut degraded_logged = false;

    debug!(source = source.name(), sink = sink.name(), "render loop started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = profile_rx.changed() => {
                if changed.is_err() {
                    // Session closed the channel
                    break;
                }
            }
        }

        let snapshot = profile_rx.borrow_and_update().clone();
        let frame = source.poll();

        if frame.valid_fraction() == 0.0 {
            metrics.record_degraded();
            if !degraded_logged {
                warn!(
                    source = source.name(),
                    frame_id = frame.frame_id,
                    "source delivered an all-invalid frame, rendering background"
                );
                degraded_logged = true;
            }
        } else {
            degraded_logged = false;
        }

        let color = render_engine::render(&frame, &snapshot);
        metrics.record_rendered();
        sink.try_send(color);
    }

    sink.shutdown().await;
    drop(source); // releases any device claim held by the source

    debug!("render loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DepthFrame;
    use dispatcher::{MemorySink, SinkHandle};
    use sensors::{DeviceClaim, SyntheticDepthSource};
    use tokio::time::sleep;

    fn memory_session(refresh: Duration) -> (CalibrationSession, dispatcher::MemoryBuffer) {
        let sink = MemorySink::new("mem", 128);
        let buffer = sink.buffer();
        let handle = SinkHandle::spawn(sink, 16, refresh);

        let mut profile = CalibrationProfile::defaults();
        // Small canvas keeps the test renders cheap
        profile.set_canvas_size(64, 48).unwrap();
        profile.set_x_lim((0, 32)).unwrap();
        profile.set_y_lim((0, 24)).unwrap();

        let source = SyntheticDepthSource::new(sensors::SyntheticConfig {
            width: 32,
            height: 24,
            seed: Some(11),
            ..Default::default()
        });

        let mut session = CalibrationSession::new(profile, Box::new(source), handle);
        session.set_refresh_interval(refresh).unwrap();
        (session, buffer)
    }

    #[tokio::test]
    async fn test_state_transitions() {
        let (mut session, _buffer) = memory_session(Duration::from_millis(10));
        assert_eq!(session.state(), SessionState::Idle);

        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Live);
        assert!(session.start().is_err()); // already live

        session.close().await;
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.start().is_err()); // no transition leaves Closed

        session.close().await; // idempotent
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_live_session_renders_frames() {
        let (mut session, buffer) = memory_session(Duration::from_millis(5));
        session.start().unwrap();

        sleep(Duration::from_millis(60)).await;
        session.close().await;

        assert!(!buffer.is_empty(), "live session should publish frames");
        let frame = buffer.latest().unwrap();
        assert_eq!((frame.width(), frame.height()), (64, 48));
        assert!(session.metrics().snapshot().frames_rendered > 0);
    }

    #[tokio::test]
    async fn test_mutation_triggers_render_between_ticks() {
        // Tick so slow that only the immediate first tick renders on its own
        let (mut session, buffer) = memory_session(Duration::from_secs(30));
        session.start().unwrap();

        sleep(Duration::from_millis(40)).await;
        let after_first_tick = buffer.len();

        session.update(ProfileUpdate::RotAngle(15.0)).unwrap();
        sleep(Duration::from_millis(40)).await;

        assert!(
            buffer.len() > after_first_tick,
            "mutation must trigger a render without waiting for the tick"
        );
        session.close().await;
    }

    #[tokio::test]
    async fn test_rejected_mutation_keeps_profile_and_counts() {
        let (mut session, _buffer) = memory_session(Duration::from_millis(10));
        let before = session.profile().clone();

        assert!(session.update(ProfileUpdate::XLim(100, 100)).is_err());
        assert_eq!(session.profile(), &before);
        assert_eq!(session.metrics().snapshot().mutations_rejected, 1);
    }

    #[tokio::test]
    async fn test_mutations_accepted_after_close_but_not_rendered() {
        let (mut session, buffer) = memory_session(Duration::from_millis(5));
        session.start().unwrap();
        sleep(Duration::from_millis(30)).await;
        session.close().await;

        let rendered = buffer.len();
        session.update(ProfileUpdate::RotAngle(30.0)).unwrap();
        assert_eq!(session.profile().rot_angle(), 30.0);

        sleep(Duration::from_millis(30)).await;
        assert_eq!(buffer.len(), rendered, "closed session must not render");
    }

    #[tokio::test]
    async fn test_close_releases_device_claim() {
        /// Source that holds a device claim, like a device-backed source does
        struct ClaimedSource {
            _claim: DeviceClaim,
        }

        impl DepthSource for ClaimedSource {
            fn name(&self) -> &str {
                "claimed"
            }
            fn resolution(&self) -> (u32, u32) {
                (4, 4)
            }
            fn poll(&mut self) -> DepthFrame {
                DepthFrame::all_invalid(4, 4, 1, 0.0)
            }
        }

        let claim = DeviceClaim::acquire("session-release-test").unwrap();
        let sink = MemorySink::new("mem", 4);
        let handle = SinkHandle::spawn(sink, 4, Duration::from_millis(10));
        let mut session = CalibrationSession::new(
            CalibrationProfile::defaults(),
            Box::new(ClaimedSource { _claim: claim }),
            handle,
        );

        session.start().unwrap();
        assert!(DeviceClaim::acquire("session-release-test").is_err());

        session.close().await;
        // Claim must be free the moment close() returns
        assert!(DeviceClaim::acquire("session-release-test").is_ok());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip_through_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calib.json");

        let (mut session, _buffer) = memory_session(Duration::from_millis(10));
        session.update(ProfileUpdate::RotAngle(-7.5)).unwrap();
        session.save(&path).unwrap();

        session.update(ProfileUpdate::RotAngle(90.0)).unwrap();
        session.load(&path).unwrap();
        assert_eq!(session.profile().rot_angle(), -7.5);

        // Load failure leaves the profile untouched
        let before = session.profile().clone();
        assert!(session.load(&dir.path().join("missing.json")).is_err());
        assert_eq!(session.profile(), &before);
    }
}
