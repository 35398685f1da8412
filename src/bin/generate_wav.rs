use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use waveprobe::save_wav;
use waveprobe::simulation::{SignalShape, SyntheticSignal};

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate synthetic waveform WAV files for replay through waveprobe")]
struct Args {
    /// TOML signal description (overrides the signal options below)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "data/synthetic/signal.wav")]
    output: PathBuf,

    /// Waveform shape: sine, square, triangle
    #[arg(long, value_enum, default_value = "sine")]
    shape: SignalShape,

    /// Signal frequency in Hz
    #[arg(long, default_value_t = 500.0)]
    frequency: f64,

    /// Peak amplitude in volts
    #[arg(long, default_value_t = 1.0)]
    amplitude: f64,

    /// DC offset in volts
    #[arg(long, default_value_t = 1.65)]
    offset: f64,

    /// Gaussian noise standard deviation in volts
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// Noise seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Signal duration in seconds
    #[arg(short, long, default_value_t = 1.0)]
    duration: f64,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 48000)]
    sample_rate: u32,

    /// Voltage mapped to full scale (+1.0); 0 V maps to -1.0
    #[arg(long, default_value_t = 3.3)]
    full_scale: f64,
}

#[derive(Debug, Deserialize)]
struct TomlConfig {
    signal: SyntheticSignal,
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn build_signal(args: &Args) -> Result<SyntheticSignal> {
    if let Some(ref path) = args.config {
        return Ok(load_toml_config(path)?.signal);
    }
    let mut signal = SyntheticSignal::new(args.shape, args.frequency, args.amplitude, args.offset);
    signal.noise_std_v = args.noise;
    signal.seed = args.seed;
    Ok(signal)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.sample_rate == 0 || args.duration <= 0.0 {
        anyhow::bail!("Sample rate and duration must be positive");
    }

    let signal = build_signal(&args)?;
    let samples = signal.render(args.sample_rate, args.duration, args.full_scale);

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    save_wav(&args.output, &samples, args.sample_rate).context("Failed to write WAV file")?;

    eprintln!(
        "Wrote {} samples of {:?} at {} Hz to {}",
        samples.len(),
        signal.shape,
        signal.frequency_hz,
        args.output.display()
    );
    Ok(())
}
