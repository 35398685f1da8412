use serde_json::{Map, Value};

use super::{Formatter, Measurement, iso8601_timestamp};

pub struct JsonFormatter;

impl JsonFormatter {
    fn record(measurement: &Measurement) -> serde_json::Result<Value> {
        let (mode, body) = match measurement {
            Measurement::Frequency(r) => ("frequency", serde_json::to_value(r)?),
            Measurement::Waveform(s) => ("waveform", serde_json::to_value(s)?),
        };

        let mut record = Map::new();
        record.insert("ts".into(), Value::String(iso8601_timestamp()));
        record.insert("mode".into(), Value::String(mode.into()));
        if let Value::Object(fields) = body {
            record.extend(fields);
        }
        Ok(Value::Object(record))
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, measurement: &Measurement) -> String {
        match Self::record(measurement) {
            Ok(record) => record.to_string(),
            Err(e) => {
                log::error!("Failed to encode measurement: {}", e);
                String::from("{}")
            }
        }
    }
}
