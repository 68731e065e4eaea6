//! WAV decoding and encoding for corpus audio and provider uploads.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;

use super::AudioBuffer;

/// Decode a WAV file into a mono buffer at its native sample rate.
pub fn read_wav(path: &Path) -> Result<AudioBuffer> {
    let reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file {}", path.display()))?;
    decode(reader).with_context(|| format!("Failed to decode WAV file {}", path.display()))
}

fn decode<R: Read>(mut reader: WavReader<R>) -> Result<AudioBuffer> {
    let spec = reader.spec();
    debug!(
        "WAV spec: sample_rate={}, channels={}, bits_per_sample={}",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .context("Failed to read float samples")?,
        SampleFormat::Int => {
            // Normalize to -1.0..1.0
            let max_int = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / max_int))
                .collect::<Result<_, _>>()
                .context("Failed to read integer samples")?
        }
    };

    Ok(AudioBuffer::from_interleaved(
        &interleaved,
        spec.channels,
        spec.sample_rate,
    ))
}

fn pcm16_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Write a mono 16-bit PCM WAV file.
pub fn write_wav(path: &Path, audio: &AudioBuffer) -> Result<()> {
    let mut writer = WavWriter::create(path, pcm16_spec(audio.sample_rate))
        .with_context(|| format!("Failed to create WAV file {}", path.display()))?;
    for &sample in &audio.samples {
        writer.write_sample(to_pcm16(sample))?;
    }
    writer.finalize().context("Failed to finalize WAV file")?;

    debug!("Wrote {:?} ({} samples)", path, audio.len());
    Ok(())
}

/// Encode a buffer as an in-memory mono 16-bit PCM WAV.
pub fn encode_wav(audio: &AudioBuffer) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, pcm16_spec(audio.sample_rate))
            .context("Failed to start WAV encoder")?;
        for &sample in &audio.samples {
            writer.write_sample(to_pcm16(sample))?;
        }
        writer.finalize().context("Failed to finalize WAV data")?;
    }
    Ok(cursor.into_inner())
}
