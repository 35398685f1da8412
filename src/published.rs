//! Lock-free published outputs.
//!
//! Each component keeps the most recent result in a handle that any number
//! of readers can poll through cheap clones. Every value is a single atomic
//! word, so readers never see a torn value and never see a peak-to-peak
//! voltage paired with another cycle's classification.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::waveform::WaveformKind;

/// Most recent corrected frequency in Hz (0.0 before the first cycle).
#[derive(Debug, Clone, Default)]
pub struct PublishedFrequency {
    bits: Arc<AtomicU64>,
}

impl PublishedFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, hz: f64) {
        self.bits.store(hz.to_bits(), Ordering::Release);
    }

    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Peak-to-peak voltage and classification published together.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveformOutput {
    pub vpp: f32,
    pub kind: WaveformKind,
}

/// Most recent [`WaveformOutput`] (`0.0 V`, unrecognized before the first cycle).
///
/// Layout of the word: bits 8..40 hold the `f32` voltage, bits 0..8 the
/// classification code.
#[derive(Debug, Clone, Default)]
pub struct PublishedWaveform {
    packed: Arc<AtomicU64>,
}

impl PublishedWaveform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, output: WaveformOutput) {
        let packed = (u64::from(output.vpp.to_bits()) << 8) | u64::from(output.kind.code());
        self.packed.store(packed, Ordering::Release);
    }

    pub fn load(&self) -> WaveformOutput {
        let packed = self.packed.load(Ordering::Acquire);
        WaveformOutput {
            vpp: f32::from_bits((packed >> 8) as u32),
            kind: WaveformKind::from_code((packed & 0xFF) as u8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_initial_and_store() {
        let published = PublishedFrequency::new();
        assert_eq!(published.load(), 0.0);

        let reader = published.clone();
        published.store(509.2437);
        assert_eq!(reader.load(), 509.2437);
    }

    #[test]
    fn test_waveform_initial_value() {
        let published = PublishedWaveform::new();
        assert_eq!(published.load(), WaveformOutput::default());
        assert_eq!(published.load().kind, WaveformKind::Unrecognized);
    }

    #[test]
    fn test_waveform_pair_is_preserved() {
        let published = PublishedWaveform::new();
        let reader = published.clone();
        for (vpp, kind) in [
            (6.6, WaveformKind::Sine),
            (0.0, WaveformKind::Square),
            (1.234_567, WaveformKind::Triangle),
            (f32::MAX, WaveformKind::Unrecognized),
        ] {
            published.store(WaveformOutput { vpp, kind });
            let out = reader.load();
            assert_eq!(out.vpp, vpp);
            assert_eq!(out.kind, kind);
        }
    }

    #[test]
    fn test_readers_on_other_threads() {
        let published = PublishedFrequency::new();
        let reader = published.clone();
        let handle = std::thread::spawn(move || {
            let mut seen = 0.0;
            while seen == 0.0 {
                seen = reader.load();
                std::hint::spin_loop();
            }
            seen
        });
        published.store(1000.0);
        assert_eq!(handle.join().unwrap(), 1000.0);
    }
}
