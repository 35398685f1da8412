mod csv;
mod json;
mod text;

use chrono::Utc;

use crate::frequency::FrequencyReading;
use crate::waveform::WaveformSnapshot;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Which analysis produced a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MeasurementKind {
    Frequency,
    Waveform,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Frequency(FrequencyReading),
    Waveform(WaveformSnapshot),
}

pub trait Formatter: Send {
    fn format(&self, measurement: &Measurement) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(
    format: OutputFormat,
    kind: MeasurementKind,
    verbose: bool,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter::new(kind)),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
