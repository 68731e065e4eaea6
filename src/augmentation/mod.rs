//! Progressive audio augmentation for fine-tuning runs.
//!
//! [`AugmentationSchedule`] gives the intensity for each epoch and
//! [`Augmenter`] applies the perturbation chain at that intensity.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::audio::AudioBuffer;

mod params;
mod perturbations;
mod schedule;

pub use params::AugmentationParams;
pub use perturbations::{
    ola_stretch, ClippingDistortion, Gain, GaussianNoise, Perturbation, PitchShift, Shift,
    TimeStretch, TrimSilence,
};
pub use schedule::{check_level, AugmentationSchedule, ScheduleError, MAX_LEVEL};

const TRIM_TOP_DB: f64 = 30.0;

/// Perturbations in the order they are applied.
pub fn perturbation_chain(params: &AugmentationParams) -> Vec<Box<dyn Perturbation>> {
    vec![
        Box::new(GaussianNoise {
            min_amplitude: params.min_noise_amplitude,
            max_amplitude: params.max_noise_amplitude,
        }),
        Box::new(TimeStretch {
            max_rate: params.max_stretch_rate,
        }),
        Box::new(PitchShift {
            max_semitones: params.max_semitones,
        }),
        Box::new(Shift {
            max_fraction: params.max_shift_fraction,
        }),
        Box::new(Gain {
            max_db: params.max_gain_db,
        }),
        Box::new(ClippingDistortion),
        Box::new(TrimSilence {
            top_db: TRIM_TOP_DB,
        }),
    ]
}

pub struct Augmenter {
    rng: StdRng,
}

impl Augmenter {
    /// A fixed seed makes every draw reproducible; `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Run the chain once at `level`, returning the perturbed audio and the
    /// names of the perturbations that fired. The level must lie in
    /// `(0, MAX_LEVEL]`.
    pub fn augment(
        &mut self,
        audio: &AudioBuffer,
        level: f64,
    ) -> Result<(AudioBuffer, Vec<&'static str>), ScheduleError> {
        check_level("requested", level)?;
        let params = AugmentationParams::from_level(level);
        let mut samples = audio.samples.clone();
        let mut applied = Vec::new();

        for perturbation in perturbation_chain(&params) {
            if self.rng.gen::<f64>() < perturbation.probability() {
                samples = perturbation.apply(samples, audio.sample_rate, &mut self.rng);
                applied.push(perturbation.name());
            }
        }

        debug!("Augmented at level {:.3}: {:?}", level, applied);
        Ok((AudioBuffer::new(samples, audio.sample_rate), applied))
    }
}
