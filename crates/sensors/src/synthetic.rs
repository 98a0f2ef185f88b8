//! Synthetic depth source
//!
//! Software stand-in for a physical depth camera: a smooth, slowly
//! undulating surface interpolated from a handful of oscillating control
//! points. With a fixed seed the sequence of frames is fully deterministic,
//! which keeps the whole pipeline testable without hardware.

use std::sync::Arc;
use std::time::Instant;

use contracts::{DepthFrame, DepthSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::metrics::SourceMetrics;

/// Synthetic source configuration
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// Grid width in cells
    pub width: u32,

    /// Grid height in cells
    pub height: u32,

    /// Surface oscillates inside this depth window (millimeters)
    pub depth_limits: (f32, f32),

    /// Number of interior control points
    pub control_points: usize,

    /// Pin a control point to each grid corner
    pub corners: bool,

    /// Per-poll phase perturbation, 0..=1 (1 ≈ a quarter oscillation)
    pub alteration_strength: f64,

    /// RNG seed; `None` draws one from the OS (non-reproducible run)
    pub seed: Option<u64>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 424,
            depth_limits: (1170.0, 1370.0),
            control_points: 4,
            corners: true,
            alteration_strength: 0.1,
            seed: None,
        }
    }
}

/// Synthetic depth source
///
/// Every poll perturbs the control-point oscillator phases and
/// re-interpolates the surface with a Gaussian radial-basis average, so
/// consecutive frames drift smoothly like sand being sculpted.
pub struct SyntheticDepthSource {
    config: SyntheticConfig,
    rng: StdRng,
    /// Control point positions in grid coordinates
    positions: Vec<(f32, f32)>,
    /// Oscillator phase per control point
    phases: Vec<f64>,
    /// RBF kernel width, derived from the grid diagonal
    sigma: f32,
    frame_id: u64,
    started: Instant,
    metrics: Arc<SourceMetrics>,
}

impl SyntheticDepthSource {
    /// Create a synthetic source
    pub fn new(config: SyntheticConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut positions = Vec::new();
        if config.corners {
            let w = (config.width - 1) as f32;
            let h = (config.height - 1) as f32;
            positions.extend([(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)]);
        }
        for _ in 0..config.control_points {
            positions.push((
                rng.random_range(0.0..config.width as f32),
                rng.random_range(0.0..config.height as f32),
            ));
        }

        let phases = (0..positions.len())
            .map(|_| rng.random_range(-std::f64::consts::PI..std::f64::consts::PI))
            .collect();

        let diag = ((config.width as f32).powi(2) + (config.height as f32).powi(2)).sqrt();
        let sigma = 0.3 * diag;

        debug!(
            width = config.width,
            height = config.height,
            points = positions.len(),
            seed = ?config.seed,
            "synthetic depth source initialized"
        );

        Self {
            config,
            rng,
            positions,
            phases,
            sigma,
            frame_id: 0,
            started: Instant::now(),
            metrics: Arc::new(SourceMetrics::new()),
        }
    }

    /// Convenience constructor for a reproducible source
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SyntheticConfig {
            seed: Some(seed),
            ..Default::default()
        })
    }

    /// Poll metrics handle
    pub fn metrics(&self) -> Arc<SourceMetrics> {
        self.metrics.clone()
    }

    /// Depth carried by an oscillator phase, inside the configured limits
    fn oscillating_depth(&self, phase: f64) -> f32 {
        let (lo, hi) = self.config.depth_limits;
        let r = (hi - lo) / 2.0;
        lo + r + (phase.sin() as f32) * r
    }

    fn interpolate(&self) -> Vec<f32> {
        let values: Vec<f32> = self.phases.iter().map(|&p| self.oscillating_depth(p)).collect();
        let inv_two_sigma_sq = 1.0 / (2.0 * self.sigma * self.sigma);

        let w = self.config.width as usize;
        let h = self.config.height as usize;
        let mut out = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let mut num = 0.0f32;
                let mut den = 0.0f32;
                for (i, &(px, py)) in self.positions.iter().enumerate() {
                    let dx = x as f32 - px;
                    let dy = y as f32 - py;
                    let weight = (-(dx * dx + dy * dy) * inv_two_sigma_sq).exp();
                    num += weight * values[i];
                    den += weight;
                }
                out.push(num / den);
            }
        }
        out
    }
}

impl DepthSource for SyntheticDepthSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn resolution(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn poll(&mut self) -> DepthFrame {
        let os_range = self.config.alteration_strength * std::f64::consts::FRAC_PI_2;
        for phase in &mut self.phases {
            *phase += self.rng.random_range(-os_range..=os_range);
        }

        self.frame_id += 1;
        self.metrics.record_poll();

        DepthFrame::new(
            self.config.width,
            self.config.height,
            self.frame_id,
            self.started.elapsed().as_secs_f64(),
            self.interpolate(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_with_seed() {
        let mut a = SyntheticDepthSource::with_seed(42);
        let mut b = SyntheticDepthSource::with_seed(42);

        for _ in 0..3 {
            let fa = a.poll();
            let fb = b.poll();
            assert_eq!(fa.values(), fb.values());
        }
    }

    #[test]
    fn test_seeds_differ() {
        let mut a = SyntheticDepthSource::with_seed(1);
        let mut b = SyntheticDepthSource::with_seed(2);
        assert_ne!(a.poll().values(), b.poll().values());
    }

    #[test]
    fn test_frames_stay_inside_depth_limits() {
        let mut source = SyntheticDepthSource::new(SyntheticConfig {
            width: 64,
            height: 48,
            seed: Some(7),
            ..Default::default()
        });

        let frame = source.poll();
        assert_eq!(frame.valid_fraction(), 1.0);
        for &v in frame.values() {
            assert!((1170.0..=1370.0).contains(&v), "depth {v} out of limits");
        }
    }

    #[test]
    fn test_frame_ids_increase() {
        let mut source = SyntheticDepthSource::with_seed(3);
        assert_eq!(source.poll().frame_id, 1);
        assert_eq!(source.poll().frame_id, 2);
    }
}
