use serde::Serialize;

use super::WaveformKind;
use crate::acquisition::{Clock, TimedBurst};
use crate::adc::ChannelAdc;
use crate::config::WaveformConfig;
use crate::error::Result;
use crate::published::{PublishedWaveform, WaveformOutput};
use crate::signal_processing::{counts_to_volts, crest_factor, rms};

/// Raw-count envelope of the first sampling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min_count: u16,
    pub max_count: u16,
    pub average_voltage: f64,
    /// At least one sample landed within the clipping margin of either rail
    pub clipping: bool,
    pub samples: usize,
}

/// Running min/max/average over raw converter counts with clipping detection.
pub struct EnvelopeTracker {
    min_count: u16,
    max_count: u16,
    voltage_sum: f64,
    clipping: bool,
    samples: usize,
    adc_max_count: u16,
    clipping_margin: u16,
    reference_voltage: f64,
}

impl EnvelopeTracker {
    pub fn new(config: &WaveformConfig) -> Self {
        Self {
            min_count: config.adc_max_count,
            max_count: 0,
            voltage_sum: 0.0,
            clipping: false,
            samples: 0,
            adc_max_count: config.adc_max_count,
            clipping_margin: config.clipping_margin,
            reference_voltage: config.reference_voltage,
        }
    }

    pub fn push(&mut self, count: u16) {
        if count <= self.clipping_margin
            || count >= self.adc_max_count.saturating_sub(self.clipping_margin)
        {
            self.clipping = true;
        }
        self.min_count = self.min_count.min(count);
        self.max_count = self.max_count.max(count);
        self.voltage_sum += counts_to_volts(count, self.reference_voltage, self.adc_max_count);
        self.samples += 1;
    }

    /// Envelope so far. An empty pass reports all-zero statistics.
    pub fn finish(&self) -> Envelope {
        if self.samples == 0 {
            return Envelope {
                min_count: 0,
                max_count: 0,
                average_voltage: 0.0,
                clipping: false,
                samples: 0,
            };
        }
        Envelope {
            min_count: self.min_count,
            max_count: self.max_count,
            average_voltage: self.voltage_sum / self.samples as f64,
            clipping: self.clipping,
            samples: self.samples,
        }
    }
}

/// Peak-to-peak estimate and the DC offset to remove before the RMS pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amplitude {
    pub vpp: f64,
    pub dc_offset: f64,
    /// The low rail clipped, so `vpp` is extrapolated from the maximum
    pub clipped_low: bool,
}

impl Amplitude {
    /// Estimate amplitude from the pass-1 envelope.
    ///
    /// When the signal clips at the low rail its bottom is lost. The signal
    /// is then taken to be a zero-centred AC waveform seen through a
    /// half-wave window: `vpp` is twice the maximum voltage and the RMS pass
    /// is recentred on half of that.
    pub fn estimate(envelope: &Envelope, config: &WaveformConfig) -> Self {
        let v_ref = config.reference_voltage;
        let max_count = config.adc_max_count;

        if envelope.clipping && envelope.min_count <= config.clipping_margin {
            let vpp = 2.0 * counts_to_volts(envelope.max_count, v_ref, max_count);
            Self {
                vpp,
                dc_offset: vpp / 2.0,
                clipped_low: true,
            }
        } else {
            let span = envelope.max_count - envelope.min_count;
            Self {
                vpp: counts_to_volts(span, v_ref, max_count),
                dc_offset: envelope.average_voltage,
                clipped_low: false,
            }
        }
    }
}

/// Sum of squares of offset-corrected voltages.
pub struct RmsAccumulator {
    offset: f64,
    sum_of_squares: f64,
    samples: usize,
}

impl RmsAccumulator {
    pub fn new(offset: f64) -> Self {
        Self {
            offset,
            sum_of_squares: 0.0,
            samples: 0,
        }
    }

    pub fn push(&mut self, voltage: f64) {
        let v = voltage - self.offset;
        self.sum_of_squares += v * v;
        self.samples += 1;
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn rms(&self) -> f64 {
        rms(self.sum_of_squares, self.samples)
    }
}

/// Everything derived in one analysis cycle.
///
/// Only [`vpp`](Self::vpp) and [`kind`](Self::kind) are published; the rest
/// is kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveformSnapshot {
    pub min_count: u16,
    pub max_count: u16,
    pub average_voltage: f64,
    pub vpp: f64,
    pub dc_offset: f64,
    pub vrms: f64,
    pub crest_factor: f64,
    pub clipping: bool,
    pub clipped_low: bool,
    pub kind: WaveformKind,
    pub pass1_samples: usize,
    pub pass2_samples: usize,
}

impl WaveformSnapshot {
    /// Combine both passes into a classified snapshot.
    pub fn from_passes(
        envelope: &Envelope,
        amplitude: &Amplitude,
        rms_pass: &RmsAccumulator,
        config: &WaveformConfig,
    ) -> Self {
        let vrms = rms_pass.rms();
        let crest = crest_factor(amplitude.vpp, vrms, config.noise_floor_vrms);
        Self {
            min_count: envelope.min_count,
            max_count: envelope.max_count,
            average_voltage: envelope.average_voltage,
            vpp: amplitude.vpp,
            dc_offset: amplitude.dc_offset,
            vrms,
            crest_factor: crest,
            clipping: envelope.clipping,
            clipped_low: amplitude.clipped_low,
            kind: config.bands.classify(crest),
            pass1_samples: envelope.samples,
            pass2_samples: rms_pass.samples(),
        }
    }

    pub fn output(&self) -> WaveformOutput {
        WaveformOutput {
            vpp: self.vpp as f32,
            kind: self.kind,
        }
    }
}

/// Dual-pass waveform classifier
///
/// Each [`update`](Self::update) samples one converter channel for two
/// fixed windows. The first pass finds the amplitude envelope and detects
/// clipping; the second measures RMS around the DC offset the first pass
/// settled on. The crest factor `(vpp / 2) / vrms` then selects the shape.
pub struct WaveformAnalyzer<A, C> {
    adc: A,
    clock: C,
    config: WaveformConfig,
    burst: TimedBurst,
    published: PublishedWaveform,
    last: Option<WaveformSnapshot>,
}

impl<A: ChannelAdc, C: Clock> WaveformAnalyzer<A, C> {
    /// Create an analyzer around an initialised converter.
    pub fn new(adc: A, clock: C, config: WaveformConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            adc,
            clock,
            burst: TimedBurst::from_millis(config.window_ms),
            config,
            published: PublishedWaveform::new(),
            last: None,
        })
    }

    pub fn config(&self) -> &WaveformConfig {
        &self.config
    }

    /// Handle for polling the latest vpp and classification.
    pub fn published(&self) -> PublishedWaveform {
        self.published.clone()
    }

    pub fn last_snapshot(&self) -> Option<&WaveformSnapshot> {
        self.last.as_ref()
    }

    /// Run both sampling passes, classify, publish, and return the snapshot.
    pub fn update(&mut self) -> WaveformSnapshot {
        let channel = self.config.channel;
        let adc = &mut self.adc;

        let mut tracker = EnvelopeTracker::new(&self.config);
        self.burst.run(&self.clock, || tracker.push(adc.read_channel(channel)));
        let envelope = tracker.finish();
        let amplitude = Amplitude::estimate(&envelope, &self.config);

        let (v_ref, max_count) = (self.config.reference_voltage, self.config.adc_max_count);
        let mut rms_pass = RmsAccumulator::new(amplitude.dc_offset);
        self.burst.run(&self.clock, || {
            rms_pass.push(counts_to_volts(adc.read_channel(channel), v_ref, max_count))
        });

        log::trace!(
            "waveform passes: {} + {} samples",
            envelope.samples,
            rms_pass.samples()
        );

        let snapshot = WaveformSnapshot::from_passes(&envelope, &amplitude, &rms_pass, &self.config);

        log::debug!(
            "waveform: counts {}..{} vpp {:.3} V offset {:.3} V vrms {:.3} V crest {:.3}{} -> {}",
            snapshot.min_count,
            snapshot.max_count,
            snapshot.vpp,
            snapshot.dc_offset,
            snapshot.vrms,
            snapshot.crest_factor,
            if snapshot.clipped_low { " (clipped)" } else { "" },
            snapshot.kind
        );

        self.published.store(snapshot.output());
        self.last = Some(snapshot);
        snapshot
    }

    /// Give back the converter and clock.
    pub fn release(self) -> (A, C) {
        (self.adc, self.clock)
    }
}
