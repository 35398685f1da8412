use super::{Formatter, Measurement, MeasurementKind, iso8601_timestamp};

pub struct CsvFormatter {
    kind: MeasurementKind,
}

impl CsvFormatter {
    pub fn new(kind: MeasurementKind) -> Self {
        Self { kind }
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, measurement: &Measurement) -> String {
        match measurement {
            Measurement::Frequency(r) => format!(
                "{},{:.3},{:.3},{}",
                iso8601_timestamp(),
                r.raw_hz,
                r.corrected_hz,
                r.calibrated
            ),
            Measurement::Waveform(s) => format!(
                "{},{},{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{},{}",
                iso8601_timestamp(),
                s.kind.name(),
                s.kind.code(),
                s.min_count,
                s.max_count,
                s.vpp,
                s.dc_offset,
                s.vrms,
                s.crest_factor,
                s.clipping,
                s.clipped_low
            ),
        }
    }

    fn header(&self) -> Option<&'static str> {
        Some(match self.kind {
            MeasurementKind::Frequency => "ts,raw_hz,corrected_hz,calibrated",
            MeasurementKind::Waveform => {
                "ts,kind,code,min_count,max_count,vpp,dc_offset,vrms,crest_factor,clipping,clipped_low"
            }
        })
    }
}
