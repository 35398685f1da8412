//! Piecewise-linear frequency calibration.
//!
//! The measurement chain (input conditioning, ADC timing, FFT bin
//! quantisation) reads periodic signals slightly low. A [`CalibrationTable`]
//! holds the frequencies the chain *reported* for a set of reference tones
//! alongside the true tone frequencies, and maps a raw reading back onto the
//! true scale by interpolating between the two bracketing entries.
//!
//! Readings outside the table are returned unchanged; the table is never
//! extrapolated.

use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, Result};

/// One reference measurement: the frequency the chain reported for a tone of
/// known frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub measured_hz: f64,
    pub true_hz: f64,
}

impl CalibrationPoint {
    pub const fn new(measured_hz: f64, true_hz: f64) -> Self {
        Self {
            measured_hz,
            true_hz,
        }
    }
}

/// Reference points measured on the production front end.
pub const DEFAULT_CALIBRATION: [CalibrationPoint; 10] = [
    CalibrationPoint::new(24.77, 25.0),
    CalibrationPoint::new(64.7, 65.0),
    CalibrationPoint::new(491.2, 500.0),
    CalibrationPoint::new(776.8, 800.0),
    CalibrationPoint::new(870.0, 900.0),
    CalibrationPoint::new(916.1, 950.0),
    CalibrationPoint::new(962.5, 1000.0),
    CalibrationPoint::new(1191.4, 1250.0),
    CalibrationPoint::new(1238.0, 1300.0),
    CalibrationPoint::new(1326.6, 1400.0),
];

/// Immutable, validated calibration curve.
///
/// Invariants: at least two points, all values finite, `measured_hz`
/// strictly increasing. Because brackets are contiguous and never overlap,
/// the first bracket containing a reading is the only one (except at a
/// shared breakpoint, where both sides agree).
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTable {
    points: Vec<CalibrationPoint>,
}

impl CalibrationTable {
    pub fn new(points: Vec<CalibrationPoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(ProbeError::Calibration(format!(
                "need at least 2 points, got {}",
                points.len()
            )));
        }

        if let Some(p) = points
            .iter()
            .find(|p| !p.measured_hz.is_finite() || !p.true_hz.is_finite())
        {
            return Err(ProbeError::Calibration(format!(
                "non-finite point ({}, {})",
                p.measured_hz, p.true_hz
            )));
        }

        if let Some(pair) = points
            .windows(2)
            .find(|pair| pair[1].measured_hz <= pair[0].measured_hz)
        {
            return Err(ProbeError::Calibration(format!(
                "measured frequencies must be strictly increasing ({} then {})",
                pair[0].measured_hz, pair[1].measured_hz
            )));
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    /// Measured-frequency span covered by the table.
    pub fn measured_range(&self) -> (f64, f64) {
        (
            self.points[0].measured_hz,
            self.points[self.points.len() - 1].measured_hz,
        )
    }

    /// Interpolated true frequency, or `None` when no bracket contains `raw_hz`.
    pub fn lookup(&self, raw_hz: f64) -> Option<f64> {
        self.points.windows(2).find_map(|pair| {
            let (lo, hi) = (pair[0], pair[1]);
            if raw_hz >= lo.measured_hz && raw_hz <= hi.measured_hz {
                Some(interpolate(lo, hi, raw_hz))
            } else {
                None
            }
        })
    }

    /// Corrected frequency; readings outside the table pass through unchanged.
    pub fn correct(&self, raw_hz: f64) -> f64 {
        self.lookup(raw_hz).unwrap_or(raw_hz)
    }
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self {
            points: DEFAULT_CALIBRATION.to_vec(),
        }
    }
}

/// Linear interpolation between two calibration points.
///
/// Breakpoints map exactly onto their true frequency.
fn interpolate(lo: CalibrationPoint, hi: CalibrationPoint, raw_hz: f64) -> f64 {
    let fraction = (raw_hz - lo.measured_hz) / (hi.measured_hz - lo.measured_hz);
    if fraction >= 1.0 {
        hi.true_hz
    } else {
        lo.true_hz + fraction * (hi.true_hz - lo.true_hz)
    }
}
