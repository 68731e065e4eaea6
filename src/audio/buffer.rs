//! In-memory mono audio passed between the corpus, providers and augmentation.

/// Sample rate expected by whisper-family models.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Mono PCM audio held in memory, samples in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Build a mono buffer from interleaved frames by averaging the channels.
    pub fn from_interleaved(interleaved: &[f32], channels: u16, sample_rate: u32) -> Self {
        let channels = channels.max(1) as usize;
        if channels == 1 {
            return Self::new(interleaved.to_vec(), sample_rate);
        }

        let samples = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Self::new(samples, sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Return a copy at `to_rate`, or a plain clone when the rate already matches.
    pub fn resampled(&self, to_rate: u32) -> Self {
        Self::new(resample(&self.samples, self.sample_rate, to_rate), to_rate)
    }
}

/// Resample audio from one sample rate to another using linear interpolation.
/// Suitable for speech audio where perfect quality isn't critical.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = (samples.len() as f64 / ratio).ceil() as usize;
    stretch_to_len(samples, new_len)
}

/// Linearly interpolate `samples` onto exactly `new_len` points spanning the same time.
pub fn stretch_to_len(samples: &[f32], new_len: usize) -> Vec<f32> {
    if samples.is_empty() || new_len == 0 {
        return Vec::new();
    }
    if new_len == samples.len() {
        return samples.to_vec();
    }

    let step = samples.len() as f64 / new_len as f64;
    (0..new_len)
        .map(|i| {
            let src_pos = i as f64 * step;
            let src_idx = src_pos as usize;
            let frac = src_pos - src_idx as f64;

            let sample = if src_idx + 1 < samples.len() {
                samples[src_idx] as f64 * (1.0 - frac) + samples[src_idx + 1] as f64 * frac
            } else if src_idx < samples.len() {
                samples[src_idx] as f64
            } else {
                0.0
            };

            sample as f32
        })
        .collect()
}
