pub mod analyzer;
pub mod classify;

pub use analyzer::{
    Amplitude, Envelope, EnvelopeTracker, RmsAccumulator, WaveformAnalyzer, WaveformSnapshot,
};
pub use classify::{ClassificationBands, CrestBand, WaveformKind};
