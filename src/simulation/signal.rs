use std::f64::consts::PI;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Ideal periodic waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SignalShape {
    Sine,
    Square,
    Triangle,
}

impl SignalShape {
    /// Unit-amplitude value at `phase` cycles (only the fractional part matters).
    pub fn value_at_phase(self, phase: f64) -> f64 {
        let p = phase - phase.floor();
        match self {
            Self::Sine => (2.0 * PI * p).sin(),
            Self::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Triangle => 4.0 * (p - 0.5).abs() - 1.0,
        }
    }

    /// Crest factor of the ideal shape.
    pub fn crest_factor(self) -> f64 {
        match self {
            Self::Sine => std::f64::consts::SQRT_2,
            Self::Square => 1.0,
            Self::Triangle => 3.0f64.sqrt(),
        }
    }
}

/// Synthetic analog signal: a periodic shape around a DC offset, with
/// optional Gaussian noise.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct SyntheticSignal {
    pub shape: SignalShape,
    pub frequency_hz: f64,
    /// Peak amplitude in volts (half of the peak-to-peak swing)
    pub amplitude_v: f64,
    pub offset_v: f64,
    #[serde(default)]
    pub noise_std_v: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SyntheticSignal {
    pub fn new(shape: SignalShape, frequency_hz: f64, amplitude_v: f64, offset_v: f64) -> Self {
        Self {
            shape,
            frequency_hz,
            amplitude_v,
            offset_v,
            noise_std_v: 0.0,
            seed: None,
        }
    }

    pub fn with_noise(mut self, noise_std_v: f64, seed: u64) -> Self {
        self.noise_std_v = noise_std_v;
        self.seed = Some(seed);
        self
    }

    /// Noise-free voltage at `t_secs`.
    pub fn voltage_at(&self, t_secs: f64) -> f64 {
        self.offset_v + self.amplitude_v * self.shape.value_at_phase(self.frequency_hz * t_secs)
    }

    /// Render `duration_secs` of the signal at `sample_rate`, normalised so
    /// that 0 V maps to -1.0 and `full_scale_voltage` to +1.0.
    pub fn render(&self, sample_rate: u32, duration_secs: f64, full_scale_voltage: f64) -> Vec<f32> {
        let num_samples = (duration_secs * f64::from(sample_rate)) as usize;
        let mut noise = NoiseSource::new(self.noise_std_v, self.seed);

        (0..num_samples)
            .map(|i| {
                let t = i as f64 / f64::from(sample_rate);
                let v = self.voltage_at(t) + noise.next();
                (2.0 * v / full_scale_voltage - 1.0).clamp(-1.0, 1.0) as f32
            })
            .collect()
    }
}

/// Seeded additive white Gaussian noise.
pub(crate) struct NoiseSource {
    rng: ChaCha8Rng,
    normal: Option<Normal<f64>>,
}

impl NoiseSource {
    pub(crate) fn new(std_dev: f64, seed: Option<u64>) -> Self {
        let normal = if std_dev > 0.0 {
            Normal::new(0.0, std_dev).ok()
        } else {
            None
        };
        Self {
            rng: create_rng(seed),
            normal,
        }
    }

    pub(crate) fn next(&mut self) -> f64 {
        match &self.normal {
            Some(normal) => normal.sample(&mut self.rng),
            None => 0.0,
        }
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_values() {
        assert!((SignalShape::Sine.value_at_phase(0.25) - 1.0).abs() < 1e-12);
        assert_eq!(SignalShape::Square.value_at_phase(0.1), 1.0);
        assert_eq!(SignalShape::Square.value_at_phase(0.6), -1.0);
        assert_eq!(SignalShape::Triangle.value_at_phase(0.0), 1.0);
        assert_eq!(SignalShape::Triangle.value_at_phase(0.5), -1.0);
        assert_eq!(SignalShape::Triangle.value_at_phase(1.25), 0.0);
    }

    #[test]
    fn test_voltage_at_includes_offset() {
        let s = SyntheticSignal::new(SignalShape::Square, 100.0, 0.5, 1.65);
        assert!((s.voltage_at(0.001) - 2.15).abs() < 1e-12);
        assert!((s.voltage_at(0.006) - 1.15).abs() < 1e-12);
    }

    #[test]
    fn test_render_length_and_range() {
        let s = SyntheticSignal::new(SignalShape::Sine, 440.0, 3.0, 1.65);
        let samples = s.render(8000, 0.5, 3.3);
        assert_eq!(samples.len(), 4000);
        assert!(samples.iter().all(|&x| (-1.0..=1.0).contains(&x)));
        // clipped against both rails
        assert!(samples.iter().any(|&x| x == 1.0));
        assert!(samples.iter().any(|&x| x == -1.0));
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let s = SyntheticSignal::new(SignalShape::Sine, 50.0, 1.0, 1.65).with_noise(0.05, 7);
        assert_eq!(s.render(1000, 0.1, 3.3), s.render(1000, 0.1, 3.3));
    }
}
