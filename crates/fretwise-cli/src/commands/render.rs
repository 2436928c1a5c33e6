//! WAV rendering command.

use super::common::{load_config, resolve_seed, write_wav};
use clap::Args;
use fretwise_synth::{SignalSynthesizer, unit_stream};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Frequency in Hz
    freq: f32,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Noise seed
    #[arg(long)]
    seed: Option<u64>,

    /// Synthesize without noise
    #[arg(long)]
    clean: bool,

    /// Write 32-bit float samples instead of 16-bit PCM
    #[arg(long)]
    float: bool,

    /// Pipeline configuration TOML
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let synth = SignalSynthesizer::new(config.synth)?;

    let waveform = if args.clean {
        synth.synthesize_clean(args.freq)?
    } else {
        synth.synthesize(args.freq, &mut unit_stream(resolve_seed(args.seed), 0))?
    };
    // The partial sum peaks well above 1.0
    let waveform = waveform.normalized()?;

    write_wav(&args.output, &waveform, args.float)?;
    println!(
        "Rendered {} Hz: {} samples @ {} Hz to {}",
        args.freq,
        waveform.len(),
        waveform.sample_rate(),
        args.output.display()
    );
    Ok(())
}
