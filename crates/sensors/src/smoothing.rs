//! Frame smoothing decorator
//!
//! Depth readouts flicker; sculpted sand does not. `SmoothedSource` wraps
//! any inner source and stabilizes its frames in two steps:
//! 1. temporal mean over `n_frames` consecutive polls, ignoring invalid
//!    cells (a cell is valid if at least one sample was)
//! 2. separable Gaussian blur with width `sigma`, weighted over valid
//!    neighbors only - blurring never resurrects an invalid cell

use contracts::{DepthFrame, DepthSource};

/// Smoothing decorator over a depth source
pub struct SmoothedSource<S> {
    inner: S,
    n_frames: usize,
    kernel: Vec<f32>,
    radius: usize,
}

impl<S: DepthSource> SmoothedSource<S> {
    /// Wrap `inner`, averaging `n_frames` polls (clamped to ≥ 1) and
    /// blurring with Gaussian width `sigma` (≤ 0 disables the blur).
    pub fn new(inner: S, n_frames: usize, sigma: f32) -> Self {
        let (kernel, radius) = gaussian_kernel(sigma);
        Self {
            inner,
            n_frames: n_frames.max(1),
            kernel,
            radius,
        }
    }

    /// Access the wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn temporal_mean(&mut self) -> DepthFrame {
        let first = self.inner.poll();
        if self.n_frames == 1 {
            return first;
        }

        let (width, height) = (first.width(), first.height());
        let len = first.values().len();
        let mut sums = vec![0.0f64; len];
        let mut counts = vec![0u32; len];

        let mut accumulate = |frame: &DepthFrame| {
            for (i, &v) in frame.values().iter().enumerate() {
                if !v.is_nan() {
                    sums[i] += v as f64;
                    counts[i] += 1;
                }
            }
        };
        accumulate(&first);

        let mut last_id = first.frame_id;
        let mut last_ts = first.timestamp;
        for _ in 1..self.n_frames {
            let frame = self.inner.poll();
            last_id = frame.frame_id;
            last_ts = frame.timestamp;
            accumulate(&frame);
        }

        let values = sums
            .iter()
            .zip(&counts)
            .map(|(&s, &c)| if c == 0 { f32::NAN } else { (s / c as f64) as f32 })
            .collect();
        DepthFrame::new(width, height, last_id, last_ts, values)
    }

    fn blur(&self, frame: DepthFrame) -> DepthFrame {
        if self.radius == 0 {
            return frame;
        }
        let (width, height) = (frame.width() as usize, frame.height() as usize);

        let horizontal = blur_axis(frame.values(), width, height, &self.kernel, self.radius, true);
        let blurred = blur_axis(&horizontal, width, height, &self.kernel, self.radius, false);

        DepthFrame::new(
            frame.width(),
            frame.height(),
            frame.frame_id,
            frame.timestamp,
            blurred,
        )
    }
}

impl<S: DepthSource> DepthSource for SmoothedSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn resolution(&self) -> (u32, u32) {
        self.inner.resolution()
    }

    fn poll(&mut self) -> DepthFrame {
        let mean = self.temporal_mean();
        self.blur(mean)
    }
}

/// Normalized 1D Gaussian kernel; radius 0 (empty kernel) when sigma ≤ 0.
fn gaussian_kernel(sigma: f32) -> (Vec<f32>, usize) {
    if sigma <= 0.0 {
        return (Vec::new(), 0);
    }
    let radius = (3.0 * sigma).ceil() as usize;
    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let inv_two_sigma_sq = 1.0 / (2.0 * sigma * sigma);
    for i in 0..=(2 * radius) {
        let d = i as f32 - radius as f32;
        kernel.push((-d * d * inv_two_sigma_sq).exp());
    }
    let total: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= total;
    }
    (kernel, radius)
}

/// One separable blur pass. Invalid cells stay invalid; valid cells average
/// over their valid neighbors with renormalized weights.
fn blur_axis(
    values: &[f32],
    width: usize,
    height: usize,
    kernel: &[f32],
    radius: usize,
    horizontal: bool,
) -> Vec<f32> {
    let mut out = vec![f32::NAN; values.len()];
    for y in 0..height {
        for x in 0..width {
            let center = values[y * width + x];
            if center.is_nan() {
                continue;
            }
            let mut num = 0.0f32;
            let mut den = 0.0f32;
            for (k, &weight) in kernel.iter().enumerate() {
                let offset = k as isize - radius as isize;
                let (nx, ny) = if horizontal {
                    (x as isize + offset, y as isize)
                } else {
                    (x as isize, y as isize + offset)
                };
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let v = values[ny as usize * width + nx as usize];
                if v.is_nan() {
                    continue;
                }
                num += weight * v;
                den += weight;
            }
            out[y * width + x] = num / den;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inner source replaying a fixed frame sequence
    struct ReplaySource {
        frames: Vec<Vec<f32>>,
        width: u32,
        height: u32,
        next: usize,
    }

    impl DepthSource for ReplaySource {
        fn name(&self) -> &str {
            "replay"
        }

        fn resolution(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn poll(&mut self) -> DepthFrame {
            let values = self.frames[self.next % self.frames.len()].clone();
            self.next += 1;
            DepthFrame::new(self.width, self.height, self.next as u64, 0.0, values)
        }
    }

    #[test]
    fn test_temporal_mean_ignores_invalid() {
        let source = ReplaySource {
            frames: vec![vec![1000.0, f32::NAN], vec![2000.0, 1500.0]],
            width: 2,
            height: 1,
            next: 0,
        };
        let mut smoothed = SmoothedSource::new(source, 2, 0.0);

        let frame = smoothed.poll();
        assert_eq!(frame.get(0, 0), Some(1500.0)); // mean of 1000 and 2000
        assert_eq!(frame.get(1, 0), Some(1500.0)); // single valid sample
    }

    #[test]
    fn test_constant_surface_unchanged_by_blur() {
        let source = ReplaySource {
            frames: vec![vec![1200.0; 25]],
            width: 5,
            height: 5,
            next: 0,
        };
        let mut smoothed = SmoothedSource::new(source, 1, 1.0);

        let frame = smoothed.poll();
        for &v in frame.values() {
            assert!((v - 1200.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_blur_preserves_invalid_cells() {
        let mut values = vec![1000.0; 9];
        values[4] = f32::NAN;
        let source = ReplaySource {
            frames: vec![values],
            width: 3,
            height: 3,
            next: 0,
        };
        let mut smoothed = SmoothedSource::new(source, 1, 1.0);

        let frame = smoothed.poll();
        assert_eq!(frame.get(1, 1), None);
        assert!(frame.get(0, 0).is_some());
    }
}
