use super::signal::{NoiseSource, SyntheticSignal};
use crate::acquisition::{AnalogInput, VirtualClock};
use crate::adc::ChannelAdc;
use crate::constants::MAX_ADC_CHANNEL;

/// Converter sampling a [`SyntheticSignal`] on simulated time.
///
/// Voltages are quantised to `[0, max_count]` counts over
/// `[0, full_scale_voltage]`, so excursions past either rail clip.
pub struct SimulatedInput {
    signal: SyntheticSignal,
    clock: VirtualClock,
    full_scale_voltage: f64,
    max_count: u16,
    read_cost_us: u64,
    noise: NoiseSource,
}

impl SimulatedInput {
    pub fn new(
        signal: SyntheticSignal,
        clock: VirtualClock,
        full_scale_voltage: f64,
        max_count: u16,
    ) -> Self {
        let noise = NoiseSource::new(signal.noise_std_v, signal.seed);
        Self {
            signal,
            clock,
            full_scale_voltage,
            max_count,
            read_cost_us: 0,
            noise,
        }
    }

    /// Simulated conversion time charged to the clock on every read.
    pub fn with_read_cost(mut self, read_cost_us: u64) -> Self {
        self.read_cost_us = read_cost_us;
        self
    }

    fn convert(&mut self) -> u16 {
        let v = self.signal.voltage_at(self.clock.seconds()) + self.noise.next();
        self.clock.advance(self.read_cost_us);
        let max = f64::from(self.max_count);
        (v / self.full_scale_voltage * max).round().clamp(0.0, max) as u16
    }
}

impl AnalogInput for SimulatedInput {
    fn read(&mut self) -> u16 {
        self.convert()
    }
}

/// Multi-channel converter with one simulated input on a single channel.
///
/// Every other channel reads as a grounded input (0), and channels beyond
/// 7 read 0 like the real part.
pub struct SimulatedAdc {
    channel: u8,
    input: SimulatedInput,
}

impl SimulatedAdc {
    pub fn new(channel: u8, input: SimulatedInput) -> Self {
        Self { channel, input }
    }
}

impl ChannelAdc for SimulatedAdc {
    fn read_channel(&mut self, channel: u8) -> u16 {
        if channel > MAX_ADC_CHANNEL || channel != self.channel {
            return 0;
        }
        self.input.convert()
    }
}
