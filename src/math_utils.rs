// src/math_utils.rs
use statrs::function::erf;
use statrs::statistics::Statistics;
use std::f64::consts::SQRT_2;

pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

/// Sample mean and standard error of the mean
///
/// The standard error uses the unbiased sample variance and is 0 for fewer than two
/// samples. An empty slice yields `(NaN, 0.0)`.
///
/// Samples large enough to overflow the sum of squared deviations are rescaled by their
/// largest magnitude before the variance is taken.
pub fn sample_mean_and_std_error(samples: &[f64]) -> (f64, f64) {
    let mean = samples.iter().mean();
    if samples.len() < 2 {
        return (mean, 0.0);
    }
    let sqrt_n = (samples.len() as f64).sqrt();
    let std_dev = samples.iter().std_dev();
    if std_dev.is_finite() || !mean.is_finite() {
        return (mean, std_dev / sqrt_n);
    }

    let scale = samples.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
    let scaled_std_dev = samples.iter().map(|x| x / scale).std_dev();
    (mean, scaled_std_dev * scale / sqrt_n)
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
