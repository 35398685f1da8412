use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{WavReader, WavSpec, WavWriter};

use crate::acquisition::{AnalogInput, VirtualClock};
use crate::adc::ChannelAdc;

/// Analog input replaying a recorded WAV file against a [`VirtualClock`].
///
/// Each read returns the sample under the clock's current time, with
/// `[-1.0, 1.0]` mapped onto `[0, max_count]`. Only the first channel of a
/// multi-channel file is used, and playback wraps at the end.
pub struct WavReplay {
    samples: Vec<f32>,
    sample_rate: u32,
    max_count: u16,
    clock: VirtualClock,
    read_cost_us: u64,
}

impl WavReplay {
    pub fn open<P: AsRef<Path>>(
        path: P,
        max_count: u16,
        clock: VirtualClock,
    ) -> anyhow::Result<Self> {
        let reader = WavReader::open(path.as_ref())?;
        let spec = reader.spec();
        let samples = read_first_channel(reader, &spec)?;
        Self::from_samples(samples, spec.sample_rate, clock).map(|r| r.with_max_count(max_count))
    }

    pub fn from_samples(
        samples: Vec<f32>,
        sample_rate: u32,
        clock: VirtualClock,
    ) -> anyhow::Result<Self> {
        if samples.is_empty() {
            anyhow::bail!("WAV recording contains no samples");
        }
        if sample_rate == 0 {
            anyhow::bail!("WAV recording has a zero sample rate");
        }
        Ok(Self {
            samples,
            sample_rate,
            max_count: 4095,
            clock,
            read_cost_us: 0,
        })
    }

    pub fn with_max_count(mut self, max_count: u16) -> Self {
        self.max_count = max_count;
        self
    }

    /// Simulated conversion time charged to the clock on every read.
    pub fn with_read_cost(mut self, read_cost_us: u64) -> Self {
        self.read_cost_us = read_cost_us;
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Recording length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    fn sample_now(&mut self) -> u16 {
        let t_us = u128::from(self.clock.peek());
        let index = (t_us * u128::from(self.sample_rate) / 1_000_000) % self.samples.len() as u128;
        self.clock.advance(self.read_cost_us);

        let max = f32::from(self.max_count);
        let s = self.samples[index as usize];
        ((s + 1.0) * 0.5 * max).round().clamp(0.0, max) as u16
    }
}

impl AnalogInput for WavReplay {
    fn read(&mut self) -> u16 {
        self.sample_now()
    }
}

/// A recording wired to channel 0; every other channel reads 0.
impl ChannelAdc for WavReplay {
    fn read_channel(&mut self, channel: u8) -> u16 {
        if channel != 0 {
            return 0;
        }
        self.sample_now()
    }
}

fn read_first_channel(
    mut reader: WavReader<BufReader<File>>,
    spec: &WavSpec,
) -> anyhow::Result<Vec<f32>> {
    let interleaved = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = 2f32.powi(i32::from(spec.bits_per_sample) - 1);
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    Ok(interleaved.into_iter().step_by(channels).collect())
}

/// Write mono 32-bit float samples.
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for &sample in samples {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    Ok(())
}
