use serde::Serialize;
use thiserror::Error;

use crate::config::AugmentationConfig;

/// Upper bound for any augmentation level. At 1.0 the chain already adds
/// noise up to 0.05, shifts pitch by two semitones and gains up to 10 dB.
pub const MAX_LEVEL: f64 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("{name} augmentation level must be in (0, {max}], got {value}", max = MAX_LEVEL)]
    InvalidLevel { name: &'static str, value: f64 },
}

/// Augmentation intensity that decays geometrically from `initial_level` at
/// the first epoch to `final_level` at the last one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AugmentationSchedule {
    initial_level: f64,
    final_level: f64,
    epochs: u32,
    decay_rate: f64,
}

impl AugmentationSchedule {
    pub fn new(initial_level: f64, final_level: f64, epochs: u32) -> Result<Self, ScheduleError> {
        check_level("initial", initial_level)?;
        check_level("final", final_level)?;

        let decay_rate = if epochs > 1 {
            (final_level / initial_level).powf(1.0 / f64::from(epochs - 1))
        } else {
            1.0
        };

        Ok(Self {
            initial_level,
            final_level,
            epochs,
            decay_rate,
        })
    }

    pub fn from_config(config: &AugmentationConfig) -> Result<Self, ScheduleError> {
        Self::new(config.initial_level, config.final_level, config.epochs)
    }

    pub fn initial_level(&self) -> f64 {
        self.initial_level
    }

    pub fn final_level(&self) -> f64 {
        self.final_level
    }

    pub fn epochs(&self) -> u32 {
        self.epochs
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Level for a 0-based epoch. Epochs past the last one keep the final level.
    pub fn level(&self, epoch: u32) -> f64 {
        if self.epochs <= 1 {
            return self.initial_level;
        }
        let epoch = epoch.min(self.epochs - 1);
        if epoch == self.epochs - 1 {
            return self.final_level;
        }
        self.initial_level * self.decay_rate.powi(epoch as i32)
    }

    pub fn levels(&self) -> Vec<f64> {
        (0..self.epochs).map(|epoch| self.level(epoch)).collect()
    }
}

/// Accept finite levels in `(0, MAX_LEVEL]`.
pub fn check_level(name: &'static str, value: f64) -> Result<(), ScheduleError> {
    if value.is_finite() && value > 0.0 && value <= MAX_LEVEL {
        Ok(())
    } else {
        Err(ScheduleError::InvalidLevel { name, value })
    }
}
