use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use super::window::hann;
use crate::constants::{INTERPOLATION_EPSILON, MIN_BLOCK_SIZE};
use crate::error::{ProbeError, Result};

/// Dominant-frequency estimator for fixed-size real sample blocks
///
/// Runs the classic peak-detection chain on a block of complex samples:
/// Hann window, forward FFT, magnitude, then a major-peak search over the
/// positive-frequency half with parabolic interpolation between bins.
///
/// The FFT plan and window are built once at construction and reused for
/// every block.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f64>>,
    window: Vec<f64>,
    magnitudes: Vec<f64>,
    sample_rate: f64,
}

impl SpectrumAnalyzer {
    /// Create an analyzer for blocks of `size` samples taken at `sample_rate` Hz.
    ///
    /// `size` must be a power of two and at least 4.
    pub fn new(size: usize, sample_rate: f64) -> Result<Self> {
        if size < MIN_BLOCK_SIZE || !size.is_power_of_two() {
            return Err(ProbeError::InvalidBlockSize { size });
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(ProbeError::Config(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }

        let mut planner = FftPlanner::<f64>::new();
        Ok(Self {
            fft: planner.plan_fft_forward(size),
            window: hann(size),
            magnitudes: vec![0.0; size],
            sample_rate,
        })
    }

    pub fn size(&self) -> usize {
        self.window.len()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Width of one FFT bin in Hz.
    pub fn bin_width(&self) -> f64 {
        self.sample_rate / self.size() as f64
    }

    /// Magnitude spectrum of the most recent block.
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Estimate the dominant frequency of `block` in Hz.
    ///
    /// The block is transformed in place. Returns 0.0 when the spectrum has
    /// no local maximum above DC.
    ///
    /// # Panics
    ///
    /// Panics if `block.len()` differs from the size the analyzer was
    /// built for.
    pub fn dominant_frequency(&mut self, block: &mut [Complex64]) -> f64 {
        assert_eq!(
            block.len(),
            self.size(),
            "block length must match analyzer size"
        );

        for (sample, &w) in block.iter_mut().zip(&self.window) {
            *sample *= w;
        }

        self.fft.process(block);

        for (mag, bin) in self.magnitudes.iter_mut().zip(block.iter()) {
            *mag = bin.norm();
        }

        major_peak(&self.magnitudes, self.sample_rate)
    }
}

/// Frequency of the strongest local maximum in a magnitude spectrum.
///
/// Only bins `1..N/2` are candidates, so the DC lobe left by an offset
/// signal never wins. The winning bin is refined with a three-point
/// parabolic fit. Returns 0.0 if no bin qualifies.
pub fn major_peak(magnitudes: &[f64], sample_rate: f64) -> f64 {
    let n = magnitudes.len();
    let half = n / 2;

    let mut best: Option<(usize, f64)> = None;
    for i in 1..half {
        let (prev, cur, next) = (magnitudes[i - 1], magnitudes[i], magnitudes[i + 1]);
        if prev < cur && cur >= next && best.is_none_or(|(_, m)| cur > m) {
            best = Some((i, cur));
        }
    }

    let Some((index, _)) = best else {
        return 0.0;
    };

    let (a, b, c) = (
        magnitudes[index - 1],
        magnitudes[index],
        magnitudes[index + 1],
    );
    let denom = a - 2.0 * b + c;
    let delta = if denom.abs() < INTERPOLATION_EPSILON {
        0.0
    } else {
        0.5 * (a - c) / denom
    };

    (index as f64 + delta) * sample_rate / n as f64
}
