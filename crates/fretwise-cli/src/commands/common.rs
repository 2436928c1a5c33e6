//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use fretwise_core::Waveform;
use fretwise_dataset::{DatasetConfig, NoteTable};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rand::Rng;
use std::path::Path;

/// Load a configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DatasetConfig> {
    match path {
        Some(path) => Ok(DatasetConfig::load(path)?),
        None => Ok(DatasetConfig::default()),
    }
}

/// Load a note table CSV, or the built-in standard-tuning table.
pub fn load_notes(path: Option<&Path>) -> anyhow::Result<NoteTable> {
    match path {
        Some(path) => Ok(NoteTable::load_csv(path)?),
        None => Ok(NoteTable::standard()),
    }
}

/// The given seed, or a fresh one that is logged so the run can be repeated.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let seed = rand::rng().random::<u64>();
        tracing::info!(seed, "no seed given, drew one");
        seed
    })
}

/// Read the first channel of a WAV file.
pub fn read_wav_mono(path: &Path) -> anyhow::Result<Waveform> {
    let reader = WavReader::open(path)
        .with_context(|| format!("failed to open WAV file '{}'", path.display()))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()?
        }
    };

    let samples = interleaved.into_iter().step_by(channels).collect();
    Ok(Waveform::new(samples, spec.sample_rate as f32))
}

/// Write a mono WAV file, as 32-bit float or 16-bit PCM.
pub fn write_wav(path: &Path, waveform: &Waveform, float: bool) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate().round() as u32,
        bits_per_sample: if float { 32 } else { 16 },
        sample_format: if float {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create WAV file '{}'", path.display()))?;

    if float {
        for &sample in waveform.samples() {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = f32::from(i16::MAX);
        for &sample in waveform.samples() {
            writer.write_sample((sample * max_val).clamp(-max_val - 1.0, max_val) as i16)?;
        }
    }

    writer.finalize()?;
    Ok(())
}
