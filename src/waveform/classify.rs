use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, Result};

/// Waveform shape inferred from the crest factor.
///
/// The numeric codes are part of the published interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveformKind {
    #[default]
    Unrecognized = 0,
    Sine = 1,
    Square = 2,
    Triangle = 3,
}

impl WaveformKind {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`code`](Self::code); unknown codes map to `Unrecognized`.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Sine,
            2 => Self::Square,
            3 => Self::Triangle,
            _ => Self::Unrecognized,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Unrecognized => "unrecognized",
            Self::Sine => "sine",
            Self::Square => "square",
            Self::Triangle => "triangle",
        }
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<WaveformKind> for u8 {
    fn from(kind: WaveformKind) -> Self {
        kind.code()
    }
}

/// Closed crest-factor interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrestBand {
    pub low: f64,
    pub high: f64,
}

impl CrestBand {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, crest_factor: f64) -> bool {
        crest_factor >= self.low && crest_factor <= self.high
    }
}

/// Crest-factor bands used to classify a waveform.
///
/// Bands are tested in the order sine, square, triangle and the first
/// match wins. Values between bands classify as
/// [`WaveformKind::Unrecognized`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassificationBands {
    pub sine: CrestBand,
    pub square: CrestBand,
    pub triangle: CrestBand,
}

impl Default for ClassificationBands {
    fn default() -> Self {
        Self {
            sine: CrestBand::new(1.30, 1.45),
            square: CrestBand::new(0.95, 1.05),
            triangle: CrestBand::new(1.50, 1.70),
        }
    }
}

impl ClassificationBands {
    pub fn classify(&self, crest_factor: f64) -> WaveformKind {
        if self.sine.contains(crest_factor) {
            WaveformKind::Sine
        } else if self.square.contains(crest_factor) {
            WaveformKind::Square
        } else if self.triangle.contains(crest_factor) {
            WaveformKind::Triangle
        } else {
            WaveformKind::Unrecognized
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, band) in [
            ("sine", self.sine),
            ("square", self.square),
            ("triangle", self.triangle),
        ] {
            if !(band.low.is_finite() && band.high.is_finite() && band.low <= band.high) {
                return Err(ProbeError::Config(format!(
                    "{name} band [{}, {}] is not a valid interval",
                    band.low, band.high
                )));
            }
        }
        Ok(())
    }
}
