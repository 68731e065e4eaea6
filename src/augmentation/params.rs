use serde::Serialize;

/// Perturbation ranges derived from a single augmentation level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AugmentationParams {
    pub level: f64,
    pub min_noise_amplitude: f64,
    pub max_noise_amplitude: f64,
    /// Pitch shift range is `-max_semitones..=max_semitones`.
    pub max_semitones: f64,
    /// Time stretch rate range is `1.0..=max_stretch_rate`.
    pub max_stretch_rate: f64,
    /// Shift range as a fraction of the clip length, in both directions.
    pub max_shift_fraction: f64,
    pub max_gain_db: f64,
}

impl AugmentationParams {
    pub fn from_level(level: f64) -> Self {
        let level = level.max(0.0);
        let noise = level * 0.05;
        let min_noise_amplitude = f64::max(0.001, noise / 10.0);

        Self {
            level,
            min_noise_amplitude,
            max_noise_amplitude: noise.max(min_noise_amplitude),
            max_semitones: level * 2.0,
            max_stretch_rate: 1.0 + level * 0.2,
            max_shift_fraction: level * 0.1,
            max_gain_db: level * 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_scale_with_level() {
        let params = AugmentationParams::from_level(0.5);
        assert!((params.max_noise_amplitude - 0.025).abs() < 1e-12);
        assert!((params.min_noise_amplitude - 0.0025).abs() < 1e-12);
        assert!((params.max_semitones - 1.0).abs() < 1e-12);
        assert!((params.max_stretch_rate - 1.1).abs() < 1e-12);
        assert!((params.max_shift_fraction - 0.05).abs() < 1e-12);
        assert!((params.max_gain_db - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_noise_floor_for_low_levels() {
        let params = AugmentationParams::from_level(0.01);
        assert_eq!(params.min_noise_amplitude, 0.001);
        assert!(params.max_noise_amplitude >= params.min_noise_amplitude);
    }
}
