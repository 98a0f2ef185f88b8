//! `run` command - live calibration session against the synthetic source

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{CalibrationProfile, DepthSource, SinkConfig, SinkType};
use dispatcher::create_sink_handle;
use profile_store::ProfileStore;
use sensors::{SmoothedSource, SyntheticConfig, SyntheticDepthSource};
use session::CalibrationSession;
use tracing::{info, warn};

use crate::cli::RunArgs;

/// Statistics from a session run
#[derive(Debug, Clone, Default)]
struct RunStats {
    frames_rendered: u64,
    degraded_renders: u64,
    mutations_rejected: u64,
    duration: Duration,
}

impl RunStats {
    fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_rendered as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    fn print_summary(&self) {
        println!("\nSession statistics");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Frames rendered: {}", self.frames_rendered);
        println!("   ├─ Degraded renders: {}", self.degraded_renders);
        println!("   ├─ Mutations rejected: {}", self.mutations_rejected);
        println!("   └─ FPS: {:.2}", self.fps());
    }
}

/// Run a live calibration session
pub async fn run_session(args: &RunArgs) -> Result<()> {
    let start_time = Instant::now();

    if args.metrics_port > 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    // Profile: load when given, defaults otherwise
    let profile = match &args.profile {
        Some(path) => ProfileStore::load(path)
            .with_context(|| format!("Failed to load profile from {}", path.display()))?,
        None => CalibrationProfile::defaults(),
    };
    info!(source = ?args.profile, "Calibration profile ready");

    // Output sink: PNG directory when requested, frame log otherwise
    let refresh = Duration::from_millis(args.refresh_ms.max(1));
    let sink_config = match &args.out_dir {
        Some(dir) => SinkConfig {
            name: "png_frames".to_string(),
            sink_type: SinkType::PngDir,
            queue_capacity: args.queue_capacity,
            params: HashMap::from([(
                "base_path".to_string(),
                dir.display().to_string(),
            )]),
        },
        None => SinkConfig {
            name: "frame_log".to_string(),
            sink_type: SinkType::Log,
            queue_capacity: args.queue_capacity,
            params: HashMap::new(),
        },
    };
    let sink = create_sink_handle(&sink_config, refresh).context("Failed to create sink")?;

    // Depth source: synthetic, with the usual smoothing on top
    let synthetic = SyntheticDepthSource::new(SyntheticConfig {
        seed: args.seed,
        ..Default::default()
    });
    let source: Box<dyn DepthSource> = if args.smooth_frames > 1 || args.smooth_sigma > 0.0 {
        Box::new(SmoothedSource::new(
            synthetic,
            args.smooth_frames,
            args.smooth_sigma,
        ))
    } else {
        Box::new(synthetic)
    };
    info!(seed = ?args.seed, "Synthetic depth source ready");

    // Session
    let mut session = CalibrationSession::new(profile, source, sink);
    session
        .set_refresh_interval(refresh)
        .context("Failed to set refresh interval")?;
    session.start().context("Failed to start calibration")?;

    if args.seconds > 0 {
        info!(seconds = args.seconds, "Session running for a fixed time");
        tokio::time::sleep(Duration::from_secs(args.seconds)).await;
    } else {
        info!("Session running, press Ctrl-C to close");
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?;
    }

    session.close().await;

    if let Some(path) = &args.save_on_exit {
        match session.save(path) {
            Ok(()) => info!(path = %path.display(), "Profile saved on exit"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to save profile"),
        }
    }

    let snapshot = session.metrics().snapshot();
    let stats = RunStats {
        frames_rendered: snapshot.frames_rendered,
        degraded_renders: snapshot.degraded_renders,
        mutations_rejected: snapshot.mutations_rejected,
        duration: start_time.elapsed(),
    };
    stats.print_summary();

    Ok(())
}
