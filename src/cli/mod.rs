mod args;
pub mod augment;
pub mod dataset;
pub mod evaluate;
pub mod provider;
pub mod text;

use anyhow::Result;
use std::path::Path;

use crate::config::Config;

pub use args::{
    AugmentCliArgs, AugmentCommand, Cli, CliCommand, DatasetCliArgs, DatasetCommand,
    EvaluateCliArgs, NormalizeCliArgs, ProviderCliArgs, ProviderCommand, WerCliArgs,
};
pub use augment::handle_augment_command;
pub use dataset::handle_dataset_command;
pub use evaluate::handle_evaluate_command;
pub use provider::handle_provider_command;
pub use text::{handle_normalize_command, handle_wer_command};

/// Load the config from `--config` if given, otherwise from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
