use std::f64::consts::PI;

/// Symmetric Hann window coefficients.
///
/// `w[i] = 0.5 * (1 - cos(2πi / (N - 1)))`, so both end points are zero and
/// the window peaks at 1.0 in the middle.
pub fn hann(size: usize) -> Vec<f64> {
    if size < 2 {
        return vec![1.0; size];
    }
    let denom = (size - 1) as f64;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos()))
        .collect()
}
