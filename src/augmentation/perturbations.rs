//! Individual audio perturbations. Each one owns its activation probability
//! and draws its parameters from the shared RNG when it fires.

use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::PI;

use crate::audio::stretch_to_len;

const FRAME_LEN: usize = 1024;
const SYNTHESIS_HOP: usize = FRAME_LEN / 4;

pub trait Perturbation: Send + Sync {
    fn name(&self) -> &'static str;

    fn probability(&self) -> f64;

    fn apply(&self, samples: Vec<f32>, sample_rate: u32, rng: &mut StdRng) -> Vec<f32>;
}

pub struct GaussianNoise {
    pub min_amplitude: f64,
    pub max_amplitude: f64,
}

impl Perturbation for GaussianNoise {
    fn name(&self) -> &'static str {
        "gaussian_noise"
    }

    fn probability(&self) -> f64 {
        0.5
    }

    fn apply(&self, mut samples: Vec<f32>, _sample_rate: u32, rng: &mut StdRng) -> Vec<f32> {
        let amplitude = rng.gen_range(self.min_amplitude..=self.max_amplitude);
        for sample in &mut samples {
            *sample += (standard_normal(rng) * amplitude) as f32;
        }
        samples
    }
}

/// Speeds speech up without changing pitch, then zero-pads back to the
/// original length.
pub struct TimeStretch {
    pub max_rate: f64,
}

impl Perturbation for TimeStretch {
    fn name(&self) -> &'static str {
        "time_stretch"
    }

    fn probability(&self) -> f64 {
        0.5
    }

    fn apply(&self, samples: Vec<f32>, _sample_rate: u32, rng: &mut StdRng) -> Vec<f32> {
        let rate = rng.gen_range(1.0..=self.max_rate);
        let len = samples.len();
        let mut stretched = ola_stretch(&samples, rate);
        stretched.resize(len, 0.0);
        stretched
    }
}

pub struct PitchShift {
    pub max_semitones: f64,
}

impl Perturbation for PitchShift {
    fn name(&self) -> &'static str {
        "pitch_shift"
    }

    fn probability(&self) -> f64 {
        0.5
    }

    fn apply(&self, samples: Vec<f32>, _sample_rate: u32, rng: &mut StdRng) -> Vec<f32> {
        let semitones = rng.gen_range(-self.max_semitones..=self.max_semitones);
        let ratio = 2f64.powf(semitones / 12.0);
        // Lengthen by the pitch ratio, then squeeze back to the original duration.
        let stretched = ola_stretch(&samples, 1.0 / ratio);
        stretch_to_len(&stretched, samples.len())
    }
}

/// Circular shift by a fraction of the clip length.
pub struct Shift {
    pub max_fraction: f64,
}

impl Perturbation for Shift {
    fn name(&self) -> &'static str {
        "shift"
    }

    fn probability(&self) -> f64 {
        0.5
    }

    fn apply(&self, mut samples: Vec<f32>, _sample_rate: u32, rng: &mut StdRng) -> Vec<f32> {
        if samples.is_empty() {
            return samples;
        }
        let fraction = rng.gen_range(-self.max_fraction..=self.max_fraction);
        let len = samples.len() as i64;
        let offset = ((fraction * len as f64).round() as i64).rem_euclid(len) as usize;
        samples.rotate_right(offset);
        samples
    }
}

pub struct Gain {
    pub max_db: f64,
}

impl Perturbation for Gain {
    fn name(&self) -> &'static str {
        "gain"
    }

    fn probability(&self) -> f64 {
        0.5
    }

    fn apply(&self, mut samples: Vec<f32>, _sample_rate: u32, rng: &mut StdRng) -> Vec<f32> {
        let db = rng.gen_range(-self.max_db..=self.max_db);
        let factor = 10f64.powf(db / 20.0) as f32;
        for sample in &mut samples {
            *sample *= factor;
        }
        samples
    }
}

/// Hard-clips the outer `0..=40` percent of sample values.
pub struct ClippingDistortion;

impl Perturbation for ClippingDistortion {
    fn name(&self) -> &'static str {
        "clipping_distortion"
    }

    fn probability(&self) -> f64 {
        0.3
    }

    fn apply(&self, samples: Vec<f32>, _sample_rate: u32, rng: &mut StdRng) -> Vec<f32> {
        if samples.is_empty() {
            return samples;
        }
        let clipped_percent = rng.gen_range(0.0..=40.0);
        let lower_percentile = clipped_percent / 2.0;

        let mut sorted = samples.clone();
        sorted.sort_by(f32::total_cmp);
        let lower = percentile(&sorted, lower_percentile);
        let upper = percentile(&sorted, 100.0 - lower_percentile);

        samples
            .into_iter()
            .map(|sample| sample.clamp(lower, upper))
            .collect()
    }
}

/// Drops leading and trailing frames quieter than `top_db` below the loudest one.
pub struct TrimSilence {
    pub top_db: f64,
}

impl Perturbation for TrimSilence {
    fn name(&self) -> &'static str {
        "trim_silence"
    }

    fn probability(&self) -> f64 {
        0.3
    }

    fn apply(&self, samples: Vec<f32>, _sample_rate: u32, _rng: &mut StdRng) -> Vec<f32> {
        const HOP: usize = 512;

        let rms: Vec<f64> = samples
            .chunks(HOP)
            .map(|frame| {
                let energy: f64 = frame.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
                (energy / frame.len() as f64).sqrt()
            })
            .collect();
        let peak = rms.iter().copied().fold(0.0, f64::max);
        if peak <= 0.0 {
            return samples;
        }

        let threshold = peak * 10f64.powf(-self.top_db / 20.0);
        let first = rms.iter().position(|&r| r >= threshold).unwrap_or(0);
        let last = rms.iter().rposition(|&r| r >= threshold).unwrap_or(rms.len() - 1);

        let start = first * HOP;
        let end = ((last + 1) * HOP).min(samples.len());
        samples[start..end].to_vec()
    }
}

fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Linearly interpolated percentile of an ascending slice.
fn percentile(sorted: &[f32], percent: f64) -> f32 {
    let rank = percent / 100.0 * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    let frac = (rank - low as f64) as f32;
    sorted[low] + (sorted[high] - sorted[low]) * frac
}

/// Overlap-add time stretch. `rate > 1` shortens the signal, `rate < 1`
/// lengthens it; pitch is roughly preserved.
pub fn ola_stretch(samples: &[f32], rate: f64) -> Vec<f32> {
    let out_len = (samples.len() as f64 / rate).round() as usize;
    if (rate - 1.0).abs() < 1e-9 {
        return samples.to_vec();
    }
    if samples.len() < FRAME_LEN {
        return stretch_to_len(samples, out_len);
    }

    let window: Vec<f32> = (0..FRAME_LEN)
        .map(|i| (0.5 - 0.5 * (2.0 * PI * i as f64 / FRAME_LEN as f64).cos()) as f32)
        .collect();

    let mut output = vec![0.0f32; out_len + FRAME_LEN];
    let mut weights = vec![0.0f32; out_len + FRAME_LEN];

    let mut out_pos = 0;
    while out_pos < out_len {
        let in_pos = (out_pos as f64 * rate) as usize;
        for (i, &w) in window.iter().enumerate() {
            let Some(&sample) = samples.get(in_pos + i) else {
                break;
            };
            output[out_pos + i] += sample * w;
            weights[out_pos + i] += w;
        }
        out_pos += SYNTHESIS_HOP;
    }

    output.truncate(out_len);
    for (sample, weight) in output.iter_mut().zip(weights) {
        if weight > 1e-6 {
            *sample /= weight;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sine(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * 440.0 * i as f64 / 16000.0).sin() as f32 * 0.5)
            .collect()
    }

    #[test]
    fn test_ola_stretch_changes_length_by_rate() {
        let input = sine(16000);
        assert_eq!(ola_stretch(&input, 2.0).len(), 8000);
        assert_eq!(ola_stretch(&input, 0.5).len(), 32000);
        assert_eq!(ola_stretch(&input, 1.0), input);
    }

    #[test]
    fn test_length_preserving_perturbations() {
        let mut rng = StdRng::seed_from_u64(1);
        let input = sine(8000);
        let perturbations: Vec<Box<dyn Perturbation>> = vec![
            Box::new(GaussianNoise {
                min_amplitude: 0.001,
                max_amplitude: 0.01,
            }),
            Box::new(TimeStretch { max_rate: 1.2 }),
            Box::new(PitchShift { max_semitones: 2.0 }),
            Box::new(Shift { max_fraction: 0.1 }),
            Box::new(Gain { max_db: 10.0 }),
            Box::new(ClippingDistortion),
        ];
        for perturbation in perturbations {
            let output = perturbation.apply(input.clone(), 16000, &mut rng);
            assert_eq!(output.len(), input.len(), "{}", perturbation.name());
        }
    }

    #[test]
    fn test_shift_is_circular() {
        let mut rng = StdRng::seed_from_u64(3);
        let input: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let mut output = Shift { max_fraction: 0.5 }.apply(input.clone(), 16000, &mut rng);
        output.sort_by(f32::total_cmp);
        assert_eq!(output, input);
    }

    #[test]
    fn test_clipping_bounds_samples() {
        let mut rng = StdRng::seed_from_u64(5);
        let input: Vec<f32> = (0..=100).map(|i| i as f32 / 100.0).collect();
        let output = ClippingDistortion.apply(input.clone(), 16000, &mut rng);
        let max = output.iter().copied().fold(f32::MIN, f32::max);
        let min = output.iter().copied().fold(f32::MAX, f32::min);
        assert!(max <= 1.0 && min >= 0.0);
        assert!(max >= 0.8 && min <= 0.2);
    }

    #[test]
    fn test_trim_removes_leading_and_trailing_silence() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut input = vec![0.0f32; 2048];
        input.extend(sine(4096));
        input.extend(vec![0.0f32; 2048]);

        let output = TrimSilence { top_db: 30.0 }.apply(input, 16000, &mut rng);
        assert_eq!(output.len(), 4096);
    }

    #[test]
    fn test_trim_keeps_all_silent_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let output = TrimSilence { top_db: 30.0 }.apply(vec![0.0; 1000], 16000, &mut rng);
        assert_eq!(output.len(), 1000);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [0.0f32, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 50.0), 2.0);
        assert_eq!(percentile(&sorted, 12.5), 0.5);
    }
}
