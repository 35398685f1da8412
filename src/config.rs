//! Configuration for the frequency corrector and waveform analyzer.
//!
//! Every field has a default matching the reference hardware (a 12-bit
//! on-chip ADC for the frequency path, an MCP3008 for the waveform path),
//! so a TOML file only needs to name what it changes:
//!
//! ```toml
//! [frequency]
//! sampling_frequency_hz = 8000
//!
//! [[frequency.calibration]]
//! measured_hz = 100.0
//! true_hz = 101.5
//!
//! [[frequency.calibration]]
//! measured_hz = 900.0
//! true_hz = 915.0
//!
//! [waveform.bands.sine]
//! low = 1.35
//! high = 1.48
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationPoint, CalibrationTable, DEFAULT_CALIBRATION};
use crate::constants::{MAX_ADC_CHANNEL, MIN_BLOCK_SIZE};
use crate::error::{ProbeError, Result};
use crate::waveform::ClassificationBands;

/// Top-level configuration
///
/// # Example
/// ```
/// use waveprobe::config::ProbeConfig;
///
/// let config = ProbeConfig::from_toml_str("[waveform]\nwindow_ms = 40\n").unwrap();
/// assert_eq!(config.waveform.window_ms, 40);
/// assert_eq!(config.frequency.sample_count, 2048);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Frequency corrector configuration
    pub frequency: FrequencyConfig,
    /// Waveform analyzer configuration
    pub waveform: WaveformConfig,
}

/// Frequency corrector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrequencyConfig {
    /// Samples per acquisition block (power of two)
    pub sample_count: usize,
    /// Nominal sampling rate in Hz
    pub sampling_frequency_hz: u32,
    /// Full-scale count of the sampling ADC
    pub adc_max_count: u16,
    /// Voltage corresponding to `adc_max_count`
    pub full_scale_voltage: f64,
    /// Calibration points, strictly increasing in measured frequency
    pub calibration: Vec<CalibrationPoint>,
}

/// Waveform analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaveformConfig {
    /// Converter channel carrying the signal (0-7)
    pub channel: u8,
    /// Full-scale count of the converter
    pub adc_max_count: u16,
    /// Converter reference voltage
    pub reference_voltage: f64,
    /// Length of each sampling pass in milliseconds
    pub window_ms: u32,
    /// Counts from either rail that still count as clipping
    pub clipping_margin: u16,
    /// RMS voltage at or below which the crest factor is not computed
    pub noise_floor_vrms: f64,
    /// Crest-factor bands for each waveform shape
    pub bands: ClassificationBands,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            sample_count: 2048,
            sampling_frequency_hz: 8192,
            adc_max_count: 4095,
            full_scale_voltage: 3.3,
            calibration: DEFAULT_CALIBRATION.to_vec(),
        }
    }
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            adc_max_count: 1023,
            reference_voltage: 3.3,
            window_ms: 20,
            clipping_margin: 5,
            noise_floor_vrms: 0.1,
            bands: ClassificationBands::default(),
        }
    }
}

impl ProbeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.frequency.validate()?;
        self.waveform.validate()
    }
}

impl FrequencyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_count < MIN_BLOCK_SIZE || !self.sample_count.is_power_of_two() {
            return Err(ProbeError::InvalidBlockSize {
                size: self.sample_count,
            });
        }
        if self.sampling_frequency_hz == 0 || self.sampling_frequency_hz > 1_000_000 {
            return Err(ProbeError::Config(format!(
                "sampling frequency must be in 1..=1000000 Hz, got {}",
                self.sampling_frequency_hz
            )));
        }
        if self.adc_max_count == 0 {
            return Err(ProbeError::Config("frequency adc_max_count must be > 0".into()));
        }
        check_positive("full_scale_voltage", self.full_scale_voltage)?;
        self.calibration_table().map(|_| ())
    }

    /// Build the validated calibration table.
    pub fn calibration_table(&self) -> Result<CalibrationTable> {
        CalibrationTable::new(self.calibration.clone())
    }
}

impl WaveformConfig {
    pub fn validate(&self) -> Result<()> {
        if self.channel > MAX_ADC_CHANNEL {
            return Err(ProbeError::Config(format!(
                "channel must be 0-{}, got {}",
                MAX_ADC_CHANNEL, self.channel
            )));
        }
        if self.adc_max_count == 0 {
            return Err(ProbeError::Config("waveform adc_max_count must be > 0".into()));
        }
        if u32::from(self.clipping_margin) * 2 >= u32::from(self.adc_max_count) {
            return Err(ProbeError::Config(format!(
                "clipping margin {} leaves no unclipped range below {}",
                self.clipping_margin, self.adc_max_count
            )));
        }
        if self.window_ms == 0 {
            return Err(ProbeError::Config("window_ms must be > 0".into()));
        }
        check_positive("reference_voltage", self.reference_voltage)?;
        if !(self.noise_floor_vrms.is_finite() && self.noise_floor_vrms >= 0.0) {
            return Err(ProbeError::Config(format!(
                "noise_floor_vrms must be >= 0, got {}",
                self.noise_floor_vrms
            )));
        }
        self.bands.validate()
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProbeError::Config(format!("{name} must be > 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ProbeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.frequency.sample_count, 2048);
        assert_eq!(config.frequency.sampling_frequency_hz, 8192);
        assert_eq!(config.waveform.adc_max_count, 1023);
        assert_eq!(config.waveform.clipping_margin, 5);
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = ProbeConfig::from_toml_str("").unwrap();
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ProbeConfig::from_toml_str(
            r#"
            [frequency]
            sampling_frequency_hz = 8000
            sample_count = 1024

            [[frequency.calibration]]
            measured_hz = 100.0
            true_hz = 101.5

            [[frequency.calibration]]
            measured_hz = 900.0
            true_hz = 915.0

            [waveform.bands.sine]
            low = 1.35
            high = 1.48
            "#,
        )
        .unwrap();

        assert_eq!(config.frequency.sampling_frequency_hz, 8000);
        assert_eq!(config.frequency.sample_count, 1024);
        assert_eq!(config.frequency.calibration.len(), 2);
        assert_eq!(config.waveform.bands.sine.low, 1.35);
        assert_eq!(config.waveform.bands.square.low, 0.95);
        assert_eq!(config.waveform.window_ms, 20);
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = ProbeConfig::from_toml_str("[waveform]\nwindow = 3\n").unwrap_err();
        assert!(matches!(err, ProbeError::ConfigFile(_)));
    }

    #[test]
    fn test_rejects_bad_block_size() {
        let err = ProbeConfig::from_toml_str("[frequency]\nsample_count = 1000\n").unwrap_err();
        assert!(matches!(err, ProbeError::InvalidBlockSize { size: 1000 }));
    }

    #[test]
    fn test_rejects_short_calibration() {
        let err = ProbeConfig::from_toml_str(
            "[[frequency.calibration]]\nmeasured_hz = 1.0\ntrue_hz = 1.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ProbeError::Calibration(_)));
    }

    #[test]
    fn test_rejects_bad_waveform_values() {
        let mut config = WaveformConfig::default();
        config.channel = 8;
        assert!(config.validate().is_err());

        let mut config = WaveformConfig::default();
        config.clipping_margin = 512;
        assert!(config.validate().is_err());

        let mut config = WaveformConfig::default();
        config.reference_voltage = 0.0;
        assert!(config.validate().is_err());

        let mut config = WaveformConfig::default();
        config.window_ms = 0;
        assert!(config.validate().is_err());
    }
}
