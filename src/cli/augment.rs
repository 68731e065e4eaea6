//! CLI handlers for the augmentation schedule.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::audio::{read_wav, write_wav};
use crate::augmentation::{AugmentationParams, AugmentationSchedule, Augmenter};
use crate::cli::{AugmentCliArgs, AugmentCommand};
use crate::config::Config;

#[derive(Serialize)]
struct EpochRow {
    epoch: u32,
    #[serde(flatten)]
    params: AugmentationParams,
}

pub fn handle_augment_command(args: AugmentCliArgs, config: Config) -> Result<()> {
    let settings = config.augmentation;

    match args.command {
        AugmentCommand::Schedule {
            initial_level,
            final_level,
            epochs,
            json,
        } => {
            let schedule = AugmentationSchedule::new(
                initial_level.unwrap_or(settings.initial_level),
                final_level.unwrap_or(settings.final_level),
                epochs.unwrap_or(settings.epochs),
            )?;
            let rows: Vec<EpochRow> = (0..schedule.epochs())
                .map(|epoch| EpochRow {
                    epoch,
                    params: AugmentationParams::from_level(schedule.level(epoch)),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            println!(
                "Decay rate {:.4} over {} epochs",
                schedule.decay_rate(),
                schedule.epochs()
            );
            println!();
            println!(
                "{:>5}  {:>6}  {:>9}  {:>9}  {:>8}  {:>7}  {:>7}",
                "epoch", "level", "noise", "semitones", "stretch", "shift", "gain dB"
            );
            for row in rows {
                let p = row.params;
                println!(
                    "{:>5}  {:>6.3}  {:>9.4}  {:>9.2}  {:>8.3}  {:>7.3}  {:>7.2}",
                    row.epoch,
                    p.level,
                    p.max_noise_amplitude,
                    p.max_semitones,
                    p.max_stretch_rate,
                    p.max_shift_fraction,
                    p.max_gain_db
                );
            }
            Ok(())
        }
        AugmentCommand::Apply {
            input,
            output,
            epoch,
            level,
            seed,
        } => {
            let level = match level {
                Some(level) => level,
                None => AugmentationSchedule::from_config(&settings)?.level(epoch.unwrap_or(0)),
            };

            let audio = read_wav(&input)
                .with_context(|| format!("Failed to load {}", input.display()))?;
            let mut augmenter = Augmenter::new(seed.or(settings.seed));
            let (augmented, applied) = augmenter.augment(&audio, level)?;
            write_wav(&output, &augmented)?;

            println!("Level:   {:.3}", level);
            println!(
                "Applied: {}",
                if applied.is_empty() {
                    "none".to_string()
                } else {
                    applied.join(", ")
                }
            );
            println!("Output:  {}", output.display());
            Ok(())
        }
    }
}
