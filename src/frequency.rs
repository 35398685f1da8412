//! Calibrated dominant-frequency measurement.

use num_complex::Complex64;
use serde::Serialize;

use crate::acquisition::{AnalogInput, Clock, UniformSampler};
use crate::calibration::CalibrationTable;
use crate::config::FrequencyConfig;
use crate::error::Result;
use crate::published::PublishedFrequency;
use crate::signal_processing::{SpectrumAnalyzer, counts_to_volts};

/// Reusable acquisition buffer, sized once at construction.
///
/// Holds the raw counts of the latest block and the complex working buffer
/// the transform runs in (real part in volts, imaginary part zero).
pub struct SampleBlock {
    raw: Vec<u16>,
    samples: Vec<Complex64>,
}

impl SampleBlock {
    pub fn new(size: usize) -> Self {
        Self {
            raw: vec![0; size],
            samples: vec![Complex64::new(0.0, 0.0); size],
        }
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Counts captured by the latest acquisition.
    pub fn raw(&self) -> &[u16] {
        &self.raw
    }

    /// Working buffer; holds the spectrum after an update.
    pub fn samples(&self) -> &[Complex64] {
        &self.samples
    }

    fn load_voltages(&mut self, full_scale_voltage: f64, max_count: u16) {
        for (sample, &count) in self.samples.iter_mut().zip(&self.raw) {
            *sample = Complex64::new(counts_to_volts(count, full_scale_voltage, max_count), 0.0);
        }
    }
}

/// Result of one correction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrequencyReading {
    /// Major spectral peak before correction
    pub raw_hz: f64,
    /// Calibrated frequency (equal to `raw_hz` when outside the table)
    pub corrected_hz: f64,
    /// A calibration bracket contained the raw frequency
    pub calibrated: bool,
}

/// Frequency corrector
///
/// Each [`update`](Self::update) captures one uniformly spaced block from the
/// analog input, finds its major spectral peak and maps it through the
/// calibration table. The spectrum is evaluated at the nominal sampling rate
/// even though the sampler truncates its interval to whole microseconds;
/// the calibration table absorbs that bias along with the rest of the
/// chain's.
pub struct FrequencyCorrector<I, C> {
    input: I,
    clock: C,
    sampler: UniformSampler,
    analyzer: SpectrumAnalyzer,
    table: CalibrationTable,
    block: SampleBlock,
    full_scale_voltage: f64,
    adc_max_count: u16,
    published: PublishedFrequency,
    last: Option<FrequencyReading>,
}

impl<I: AnalogInput, C: Clock> FrequencyCorrector<I, C> {
    /// Create a corrector around an initialised input.
    pub fn new(input: I, clock: C, config: &FrequencyConfig) -> Result<Self> {
        config.validate()?;
        let table = config.calibration_table()?;
        let analyzer =
            SpectrumAnalyzer::new(config.sample_count, f64::from(config.sampling_frequency_hz))?;

        Ok(Self {
            input,
            clock,
            sampler: UniformSampler::from_rate(config.sampling_frequency_hz, config.sample_count),
            analyzer,
            table,
            block: SampleBlock::new(config.sample_count),
            full_scale_voltage: config.full_scale_voltage,
            adc_max_count: config.adc_max_count,
            published: PublishedFrequency::new(),
            last: None,
        })
    }

    pub fn calibration(&self) -> &CalibrationTable {
        &self.table
    }

    pub fn sampler(&self) -> &UniformSampler {
        &self.sampler
    }

    pub fn sample_block(&self) -> &SampleBlock {
        &self.block
    }

    /// Magnitude spectrum of the latest block.
    pub fn magnitudes(&self) -> &[f64] {
        self.analyzer.magnitudes()
    }

    /// Handle for polling the latest corrected frequency.
    pub fn published(&self) -> PublishedFrequency {
        self.published.clone()
    }

    /// Latest corrected frequency, 0.0 before the first update.
    pub fn corrected_frequency(&self) -> f64 {
        self.last.map_or(0.0, |r| r.corrected_hz)
    }

    pub fn last_reading(&self) -> Option<FrequencyReading> {
        self.last
    }

    /// Acquire, analyse, correct, publish.
    pub fn update(&mut self) -> FrequencyReading {
        let input = &mut self.input;
        let raw = &mut self.block.raw;
        self.sampler.acquire(&self.clock, |i| raw[i] = input.read());

        self.block.load_voltages(self.full_scale_voltage, self.adc_max_count);
        let raw_hz = self.analyzer.dominant_frequency(&mut self.block.samples);

        let reading = self.correct(raw_hz);
        self.published.store(reading.corrected_hz);
        self.last = Some(reading);
        reading
    }

    /// Map a raw peak frequency through the calibration table.
    pub fn correct(&self, raw_hz: f64) -> FrequencyReading {
        match self.table.lookup(raw_hz) {
            Some(corrected_hz) => {
                log::debug!("frequency: raw {:.2} Hz -> {:.2} Hz", raw_hz, corrected_hz);
                FrequencyReading {
                    raw_hz,
                    corrected_hz,
                    calibrated: true,
                }
            }
            None => {
                let (_, hi) = self.table.measured_range();
                if raw_hz > hi {
                    log::warn!(
                        "frequency {:.2} Hz above calibrated range (max {:.2} Hz), passing through",
                        raw_hz,
                        hi
                    );
                } else {
                    log::debug!("frequency: raw {:.2} Hz outside calibration, passing through", raw_hz);
                }
                FrequencyReading {
                    raw_hz,
                    corrected_hz: raw_hz,
                    calibrated: false,
                }
            }
        }
    }

    /// Give back the input and clock.
    pub fn release(self) -> (I, C) {
        (self.input, self.clock)
    }
}
