mod test_signals;

use approx::assert_abs_diff_eq;
use waveprobe::calibration::CalibrationPoint;
use waveprobe::config::FrequencyConfig;
use waveprobe::simulation::SignalShape;

use test_signals::{frequency_config, frequency_rig, tone};

#[test]
fn test_on_bin_tone_is_corrected_between_breakpoints() {
    let config = frequency_config();
    let mut corrector = frequency_rig(tone(SignalShape::Sine, 500.0), &config);

    let reading = corrector.update();

    assert_abs_diff_eq!(reading.raw_hz, 500.0, epsilon = 0.05);
    assert!(reading.calibrated);
    // (491.2 -> 500) .. (776.8 -> 800)
    assert_abs_diff_eq!(reading.corrected_hz, 509.24, epsilon = 0.1);
}

#[test]
fn test_repeated_cycles_are_stable() {
    let config = frequency_config();
    let mut corrector = frequency_rig(tone(SignalShape::Sine, 1000.0), &config);

    let first = corrector.update();
    for _ in 0..3 {
        let next = corrector.update();
        assert_abs_diff_eq!(next.corrected_hz, first.corrected_hz, epsilon = 0.05);
    }
    assert_abs_diff_eq!(first.raw_hz, 1000.0, epsilon = 0.05);
}

#[test]
fn test_off_bin_tone_uses_interpolated_peak() {
    let config = frequency_config();
    let mut corrector = frequency_rig(tone(SignalShape::Sine, 777.0), &config);

    let reading = corrector.update();

    assert_abs_diff_eq!(reading.raw_hz, 777.0, epsilon = 1.0);
    assert_eq!(
        reading.corrected_hz,
        corrector.calibration().correct(reading.raw_hz)
    );
    assert_abs_diff_eq!(reading.corrected_hz, 800.2, epsilon = 1.5);
}

#[test]
fn test_below_table_passes_through() {
    let config = frequency_config();
    // bin 4 at 3.90625 Hz per bin
    let mut corrector = frequency_rig(tone(SignalShape::Sine, 15.625), &config);

    let reading = corrector.update();

    assert!(!reading.calibrated);
    assert_eq!(reading.corrected_hz, reading.raw_hz);
    assert_abs_diff_eq!(reading.raw_hz, 15.625, epsilon = 0.05);
}

#[test]
fn test_square_wave_fundamental_wins() {
    let config = frequency_config();
    let mut corrector = frequency_rig(tone(SignalShape::Square, 250.0), &config);

    let reading = corrector.update();

    // third harmonic at 750 Hz is a third of the fundamental
    assert_abs_diff_eq!(reading.raw_hz, 250.0, epsilon = 0.05);
}

#[test]
fn test_noisy_tone() {
    let config = frequency_config();
    let signal = tone(SignalShape::Sine, 500.0).with_noise(0.05, 42);
    let mut corrector = frequency_rig(signal, &config);

    let reading = corrector.update();

    assert_abs_diff_eq!(reading.raw_hz, 500.0, epsilon = 0.5);
}

#[test]
fn test_published_handle_tracks_updates() {
    let config = frequency_config();
    let mut corrector = frequency_rig(tone(SignalShape::Sine, 500.0), &config);
    let published = corrector.published();

    assert_eq!(published.load(), 0.0);
    assert_eq!(corrector.corrected_frequency(), 0.0);

    let reading = corrector.update();
    let reader = std::thread::spawn(move || published.load());

    assert_eq!(reader.join().unwrap(), reading.corrected_hz);
    assert_eq!(corrector.last_reading(), Some(reading));
}

#[test]
fn test_custom_table_from_config() {
    let config = FrequencyConfig {
        calibration: vec![
            CalibrationPoint::new(400.0, 440.0),
            CalibrationPoint::new(600.0, 660.0),
        ],
        ..frequency_config()
    };
    let mut corrector = frequency_rig(tone(SignalShape::Sine, 500.0), &config);

    let reading = corrector.update();

    assert_abs_diff_eq!(reading.corrected_hz, 550.0, epsilon = 0.1);
}

#[test]
fn test_invalid_config_is_rejected() {
    use waveprobe::acquisition::VirtualClock;
    use waveprobe::simulation::SimulatedInput;
    use waveprobe::{FrequencyCorrector, ProbeError};

    let config = FrequencyConfig {
        sample_count: 1000,
        ..frequency_config()
    };
    let clock = VirtualClock::new();
    let input = SimulatedInput::new(tone(SignalShape::Sine, 500.0), clock.clone(), 3.3, 4095);

    let err = FrequencyCorrector::new(input, clock, &config).err();
    assert!(matches!(err, Some(ProbeError::InvalidBlockSize { size: 1000 })));
}
