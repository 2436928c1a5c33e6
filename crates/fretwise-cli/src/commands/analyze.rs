//! Single-note analysis command.

use super::common::{load_config, read_wav_mono, resolve_seed};
use clap::Args;
use fretwise_analysis::{HarmonicRatioCalculator, SpectralPeakEstimator};
use fretwise_core::Waveform;
use fretwise_synth::{SignalSynthesizer, unit_stream};
use std::path::PathBuf;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Frequency of the note to synthesize, in Hz
    #[arg(required_unless_present = "input")]
    freq: Option<f32>,

    /// Analyze the first channel of a WAV file instead
    #[arg(short, long, value_name = "WAV", conflicts_with = "freq")]
    input: Option<PathBuf>,

    /// Noise seed
    #[arg(long)]
    seed: Option<u64>,

    /// Synthesize without noise
    #[arg(long)]
    clean: bool,

    /// Pipeline configuration TOML
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    let (source, waveform) = match (args.input, args.freq) {
        (Some(path), _) => {
            let waveform = read_wav_mono(&path)?;
            (path.display().to_string(), waveform)
        }
        (None, Some(freq)) => {
            let synth = SignalSynthesizer::new(config.synth.clone())?;
            let waveform = if args.clean {
                synth.synthesize_clean(freq)?
            } else {
                synth.synthesize(freq, &mut unit_stream(resolve_seed(args.seed), 0))?
            };
            (format!("{freq} Hz"), waveform)
        }
        (None, None) => anyhow::bail!("either a frequency or --input is required"),
    };

    let estimator = SpectralPeakEstimator::new(config.estimator.clone())?;
    let estimate = estimator.analyze(&waveform)?;
    if !estimate.is_detected() {
        anyhow::bail!("no spectral peak above threshold in {}", source);
    }
    let ratios = HarmonicRatioCalculator::new().ratios(&waveform, estimate.fundamental)?;

    if args.json {
        let report = serde_json::json!({
            "source": source,
            "sample_rate": waveform.sample_rate(),
            "samples": waveform.len(),
            "fundamental": estimate.fundamental,
            "frames": estimate.num_frames,
            "peaks": estimate.peak_frequencies.len(),
            "harmonic_ratios": ratios,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&source, &waveform, estimate.fundamental, &ratios);
    println!(
        "Peaks:       {} across {} frames",
        estimate.peak_frequencies.len(),
        estimate.num_frames
    );
    Ok(())
}

fn print_report(source: &str, waveform: &Waveform, fundamental: f32, ratios: &[f32]) {
    println!("Source:      {}", source);
    println!(
        "Signal:      {} samples @ {} Hz ({:.3} s)",
        waveform.len(),
        waveform.sample_rate(),
        waveform.duration()
    );
    println!("Fundamental: {:.2} Hz", fundamental);
    println!();
    println!("{:>8}  {:>12}  {:>8}", "Harmonic", "Freq (Hz)", "Ratio");
    for (i, ratio) in ratios.iter().enumerate() {
        let n = i + 1;
        println!("{:>8}  {:>12.2}  {:>8.4}", n, fundamental * n as f32, ratio);
    }
}
