//! Numeric constants for signal processing stability
//!
//! Thresholds and epsilon values shared by the spectral and waveform paths.

/// Epsilon guarding the parabolic peak interpolation denominator.
/// A flat top (three equal magnitudes) yields no sub-bin offset.
pub const INTERPOLATION_EPSILON: f64 = 1e-12;

/// Highest channel index on an 8-channel converter.
pub const MAX_ADC_CHANNEL: u8 = 7;

/// Smallest FFT block the peak search can work with
/// (DC bin, one candidate bin, and its two neighbours).
pub const MIN_BLOCK_SIZE: usize = 4;
