//! Shared rigs for the integration tests.
#![allow(dead_code)]

use waveprobe::acquisition::VirtualClock;
use waveprobe::config::{FrequencyConfig, WaveformConfig};
use waveprobe::simulation::{SignalShape, SimulatedAdc, SimulatedInput, SyntheticSignal};
use waveprobe::{FrequencyCorrector, WaveformAnalyzer};

/// Sampling rate whose interval (125 us) is a whole number of microseconds.
pub const EXACT_RATE_HZ: u32 = 8000;

/// 2048-point blocks at 8 kHz: 3.90625 Hz bins, so 500 Hz lands on bin 128.
pub fn frequency_config() -> FrequencyConfig {
    FrequencyConfig {
        sampling_frequency_hz: EXACT_RATE_HZ,
        ..FrequencyConfig::default()
    }
}

pub fn tone(shape: SignalShape, frequency_hz: f64) -> SyntheticSignal {
    SyntheticSignal::new(shape, frequency_hz, 1.0, 1.65)
}

pub fn frequency_rig(
    signal: SyntheticSignal,
    config: &FrequencyConfig,
) -> FrequencyCorrector<SimulatedInput, VirtualClock> {
    let clock = VirtualClock::new();
    let input = SimulatedInput::new(
        signal,
        clock.clone(),
        config.full_scale_voltage,
        config.adc_max_count,
    );
    FrequencyCorrector::new(input, clock, config).unwrap()
}

/// Each burst iteration costs one 1 us poll plus a 49 us conversion, so a
/// 20 ms window holds exactly 400 samples.
pub const CONVERSION_US: u64 = 49;

pub fn waveform_rig(
    signal: SyntheticSignal,
    config: WaveformConfig,
) -> WaveformAnalyzer<SimulatedAdc, VirtualClock> {
    let clock = VirtualClock::new();
    let input = SimulatedInput::new(
        signal,
        clock.clone(),
        config.reference_voltage,
        config.adc_max_count,
    )
    .with_read_cost(CONVERSION_US);
    let adc = SimulatedAdc::new(config.channel, input);
    WaveformAnalyzer::new(adc, clock, config).unwrap()
}

pub fn temp_wav(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("waveprobe-it-{}-{}.wav", name, std::process::id()))
}
