//! CLI handler for dataset preparation.

use anyhow::Result;
use tracing::info;

use crate::cli::{DatasetCliArgs, DatasetCommand};
use crate::config::Config;
use crate::corpus::{prepare, read_manifest, write_manifest, PrepareOptions};

pub fn handle_dataset_command(args: DatasetCliArgs, config: Config) -> Result<()> {
    match args.command {
        DatasetCommand::Prepare {
            manifests,
            output_dir,
            seed,
            test_fraction,
            no_exclusions,
        } => {
            let mut entries = Vec::new();
            for manifest in &manifests {
                let loaded = read_manifest(manifest)?;
                info!("Loaded {} entries from {:?}", loaded.len(), manifest);
                entries.extend(loaded);
            }

            let options = PrepareOptions {
                seed: seed.unwrap_or(config.dataset.seed),
                test_fraction: test_fraction.unwrap_or(config.dataset.test_fraction),
                excluded_texts: if no_exclusions {
                    Vec::new()
                } else {
                    config.dataset.excluded_texts
                },
            };

            let split = prepare(entries, &options)?;
            let train_path = output_dir.join("train.jsonl");
            let test_path = output_dir.join("test.jsonl");
            write_manifest(&train_path, &split.train)?;
            write_manifest(&test_path, &split.test)?;

            println!();
            println!("Dataset Prepared");
            println!("================");
            println!();
            println!("Train:    {} ({})", split.train.len(), train_path.display());
            println!("Test:     {} ({})", split.test.len(), test_path.display());
            println!("Excluded: {}", split.dropped);
            println!("Seed:     {}", options.seed);
            println!();
            Ok(())
        }
    }
}
