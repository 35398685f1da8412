/// Convert a raw ADC count to volts for a converter whose full-scale count
/// `max_count` corresponds to `full_scale_voltage`.
pub fn counts_to_volts(count: u16, full_scale_voltage: f64, max_count: u16) -> f64 {
    f64::from(count) * full_scale_voltage / f64::from(max_count)
}

/// Root-mean-square from an accumulated sum of squares.
///
/// Returns 0.0 for an empty window.
pub fn rms(sum_of_squares: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (sum_of_squares / count as f64).sqrt()
}

/// Ratio of peak amplitude (half of `vpp`) to RMS.
///
/// An RMS at or below `noise_floor` gives 0.0 rather than a meaningless
/// large ratio.
pub fn crest_factor(vpp: f64, vrms: f64, noise_floor: f64) -> f64 {
    if vrms > noise_floor { (vpp / 2.0) / vrms } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_to_volts() {
        assert!((counts_to_volts(0, 3.3, 1023) - 0.0).abs() < 1e-12);
        assert!((counts_to_volts(1023, 3.3, 1023) - 3.3).abs() < 1e-12);
        assert!((counts_to_volts(2048, 3.3, 4095) - 1.6504).abs() < 1e-3);
    }

    #[test]
    fn test_rms() {
        assert_eq!(rms(0.0, 0), 0.0);
        // four samples of +/-2
        assert!((rms(16.0, 4) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_crest_factor() {
        let sine = crest_factor(2.0, std::f64::consts::FRAC_1_SQRT_2, 0.1);
        assert!((sine - std::f64::consts::SQRT_2).abs() < 1e-12);

        assert!((crest_factor(2.0, 1.0, 0.1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_crest_factor_noise_floor() {
        assert_eq!(crest_factor(5.0, 0.05, 0.1), 0.0);
        assert_eq!(crest_factor(5.0, 0.1, 0.1), 0.0);
        assert_eq!(crest_factor(5.0, 0.0, 0.1), 0.0);
    }
}
