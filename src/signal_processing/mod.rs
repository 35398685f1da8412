pub mod math;
pub mod spectrum;
pub mod window;

pub use math::{counts_to_volts, crest_factor, rms};
pub use spectrum::{SpectrumAnalyzer, major_peak};
pub use window::hann;
