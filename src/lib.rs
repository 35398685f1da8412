pub mod acquisition;
pub mod adc;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod error;
pub mod frequency;
pub mod output;
pub mod published;
pub mod signal_processing;
pub mod waveform;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::ProbeConfig;
pub use error::{ProbeError, Result};
pub use frequency::FrequencyCorrector;
pub use waveform::WaveformAnalyzer;
pub use wav::save_wav;
