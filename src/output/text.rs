use super::{Formatter, Measurement};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, measurement: &Measurement) -> String {
        match measurement {
            Measurement::Frequency(r) => {
                let note = if r.calibrated { "" } else { " (uncalibrated)" };
                format!(
                    "Frequency: {:>8.2} Hz (raw: {:>8.2} Hz){}",
                    r.corrected_hz, r.raw_hz, note
                )
            }
            Measurement::Waveform(s) if self.verbose => format!(
                "Waveform: {:<12} Vpp: {:.3} V [Vrms: {:.3} V, crest: {:.3}, dc: {:.3} V, counts: {}..{}, clip: {}, n: {}/{}]",
                s.kind.name(),
                s.vpp,
                s.vrms,
                s.crest_factor,
                s.dc_offset,
                s.min_count,
                s.max_count,
                if s.clipped_low {
                    "low"
                } else if s.clipping {
                    "high"
                } else {
                    "no"
                },
                s.pass1_samples,
                s.pass2_samples
            ),
            Measurement::Waveform(s) => format!(
                "Waveform: {:<12} Vpp: {:.3} V crest: {:.3}",
                s.kind.name(),
                s.vpp,
                s.crest_factor
            ),
        }
    }
}
