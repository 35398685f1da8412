use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rolling_stats::Stats;

use waveprobe::acquisition::{AnalogInput, VirtualClock};
use waveprobe::adc::ChannelAdc;
use waveprobe::config::{FrequencyConfig, WaveformConfig};
use waveprobe::output::{Formatter, Measurement, MeasurementKind, OutputFormat, create_formatter};
use waveprobe::wav::WavReplay;
use waveprobe::{FrequencyCorrector, ProbeConfig, WaveformAnalyzer};

#[cfg(feature = "simulation")]
use waveprobe::simulation::{SignalShape, SimulatedAdc, SimulatedInput, SyntheticSignal};

#[derive(Parser, Debug)]
#[command(name = "waveprobe")]
#[command(about = "Measure frequency or classify waveform shape of a sampled signal", long_about = None)]
struct Args {
    /// WAV recording to replay (first channel is used)
    input: Option<PathBuf>,

    /// Measurement to run: frequency, waveform
    #[arg(short = 'm', long, value_enum, default_value = "frequency")]
    mode: MeasurementKind,

    /// Number of measurement cycles
    #[arg(short = 'n', long, default_value_t = 10)]
    cycles: usize,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Simulated conversion time per read in microseconds
    #[arg(long, default_value_t = 10)]
    read_cost_us: u64,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Analyse a synthetic signal instead of a WAV file
    #[cfg(feature = "simulation")]
    #[arg(long, value_enum)]
    simulate: Option<SignalShape>,

    /// Synthetic signal frequency in Hz
    #[cfg(feature = "simulation")]
    #[arg(long, default_value_t = 500.0)]
    sim_frequency: f64,

    /// Synthetic signal peak amplitude in volts
    #[cfg(feature = "simulation")]
    #[arg(long, default_value_t = 1.0)]
    sim_amplitude: f64,

    /// Synthetic signal DC offset in volts
    #[cfg(feature = "simulation")]
    #[arg(long, default_value_t = 1.65)]
    sim_offset: f64,

    /// Synthetic noise standard deviation in volts
    #[cfg(feature = "simulation")]
    #[arg(long, default_value_t = 0.0)]
    sim_noise: f64,

    /// Seed for synthetic noise
    #[cfg(feature = "simulation")]
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &args.config {
        Some(path) => ProbeConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ProbeConfig::default(),
    };

    let formatter = create_formatter(args.format, args.mode, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }

    // Virtual time: every poll of the busy-wait loops costs 1 us.
    let clock = VirtualClock::new();

    let (label, stats) = match args.mode {
        MeasurementKind::Frequency => {
            let fc = &config.frequency;
            let input = open_input(&args, fc.adc_max_count, fc.full_scale_voltage, &clock)?;
            ("corrected_hz", run_frequency(input, clock, fc, args.cycles, formatter.as_ref())?)
        }
        MeasurementKind::Waveform => {
            let wc = config.waveform.clone();
            let adc = open_adc(&args, &wc, &clock)?;
            ("vpp", run_waveform(adc, clock, wc, args.cycles, formatter.as_ref())?)
        }
    };

    if args.verbose > 0 && stats.count > 0 {
        eprintln!(
            "{}: n={} mean={:.4} std={:.4} min={:.4} max={:.4}",
            label, stats.count, stats.mean, stats.std_dev, stats.min, stats.max
        );
    }

    Ok(())
}

fn run_frequency<I: AnalogInput>(
    input: I,
    clock: VirtualClock,
    config: &FrequencyConfig,
    cycles: usize,
    formatter: &dyn Formatter,
) -> anyhow::Result<Stats<f32>> {
    let mut corrector =
        FrequencyCorrector::new(input, clock, config).context("Invalid frequency configuration")?;
    log::info!(
        "Frequency: {} samples, {} us interval",
        config.sample_count,
        corrector.sampler().interval_us()
    );

    let mut stats = Stats::new();
    for _ in 0..cycles {
        let reading = corrector.update();
        println!("{}", formatter.format(&Measurement::Frequency(reading)));
        stats.update(reading.corrected_hz as f32);
    }
    Ok(stats)
}

fn run_waveform<A: ChannelAdc>(
    adc: A,
    clock: VirtualClock,
    config: WaveformConfig,
    cycles: usize,
    formatter: &dyn Formatter,
) -> anyhow::Result<Stats<f32>> {
    log::info!(
        "Waveform: channel {}, {} ms windows",
        config.channel,
        config.window_ms
    );
    let mut analyzer =
        WaveformAnalyzer::new(adc, clock, config).context("Invalid waveform configuration")?;

    let mut stats = Stats::new();
    for _ in 0..cycles {
        let snapshot = analyzer.update();
        println!("{}", formatter.format(&Measurement::Waveform(snapshot)));
        stats.update(snapshot.vpp as f32);
    }
    Ok(stats)
}

fn open_replay(args: &Args, max_count: u16, clock: &VirtualClock) -> anyhow::Result<WavReplay> {
    let path = args
        .input
        .as_ref()
        .context("No input: pass a WAV file or --simulate")?;
    let replay = WavReplay::open(path, max_count, clock.clone())
        .with_context(|| format!("Failed to open {}", path.display()))?
        .with_read_cost(args.read_cost_us);
    log::info!(
        "Replaying {} ({} Hz, {:.2} s)",
        path.display(),
        replay.sample_rate(),
        replay.duration_secs()
    );
    Ok(replay)
}

#[cfg(feature = "simulation")]
fn simulated_input(
    args: &Args,
    shape: SignalShape,
    full_scale_voltage: f64,
    max_count: u16,
    clock: &VirtualClock,
) -> SimulatedInput {
    let mut signal =
        SyntheticSignal::new(shape, args.sim_frequency, args.sim_amplitude, args.sim_offset);
    signal.noise_std_v = args.sim_noise;
    signal.seed = args.seed;
    log::info!("Simulating {:?}", signal);
    SimulatedInput::new(signal, clock.clone(), full_scale_voltage, max_count)
        .with_read_cost(args.read_cost_us)
}

fn open_input(
    args: &Args,
    max_count: u16,
    full_scale_voltage: f64,
    clock: &VirtualClock,
) -> anyhow::Result<Box<dyn AnalogInput>> {
    #[cfg(feature = "simulation")]
    if let Some(shape) = args.simulate {
        let input = simulated_input(args, shape, full_scale_voltage, max_count, clock);
        return Ok(Box::new(input));
    }
    #[cfg(not(feature = "simulation"))]
    let _ = full_scale_voltage;

    Ok(Box::new(open_replay(args, max_count, clock)?))
}

fn open_adc(
    args: &Args,
    config: &WaveformConfig,
    clock: &VirtualClock,
) -> anyhow::Result<Box<dyn ChannelAdc>> {
    #[cfg(feature = "simulation")]
    if let Some(shape) = args.simulate {
        let input = simulated_input(
            args,
            shape,
            config.reference_voltage,
            config.adc_max_count,
            clock,
        );
        return Ok(Box::new(SimulatedAdc::new(config.channel, input)));
    }

    if config.channel != 0 {
        log::warn!(
            "WAV replay is wired to channel 0; channel {} will read 0",
            config.channel
        );
    }
    Ok(Box::new(open_replay(args, config.adc_max_count, clock)?))
}
