use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::corpus::DEFAULT_EXCLUDED_TEXTS;
use crate::normalizer::NormalizerKind;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderSettings,
    pub evaluation: EvaluationConfig,
    pub augmentation: AugmentationConfig,
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub name: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub api_endpoint: Option<String>,
    pub api_key: Option<String>,
    pub command_path: Option<String>,
    pub model_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Which normalizer to run over raw hypotheses before scoring.
    pub normalizer: NormalizerKind,
    /// Directory the CSV report is written to.
    pub output_dir: PathBuf,
    /// Leading part of the report file name, usually the model name.
    pub report_prefix: String,
    /// Keep the JSON Lines run log after a successful run.
    pub keep_run_log: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationConfig {
    pub initial_level: f64,
    pub final_level: f64,
    pub epochs: u32,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub seed: u64,
    pub test_fraction: f64,
    /// Transcripts dropped during preparation, matched exactly.
    pub excluded_texts: Vec<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: Some("openai-api".to_string()),
            model: Some("whisper-1".to_string()),
            language: Some("en".to_string()),
            api_endpoint: None,
            api_key: None,
            command_path: None,
            model_path: None,
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerKind::Atc,
            output_dir: PathBuf::from("."),
            report_prefix: "whisper-medium.en".to_string(),
            keep_run_log: false,
        }
    }
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            initial_level: 0.5,
            final_level: 0.1,
            epochs: 10,
            seed: None,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.2,
            excluded_texts: DEFAULT_EXCLUDED_TEXTS
                .iter()
                .map(|text| text.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load the config from the default location, writing defaults on first use.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load the config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [evaluation]
            normalizer = "trim"
            report_prefix = "fine-tuned"
            "#,
        )
        .unwrap();

        assert_eq!(config.evaluation.normalizer, NormalizerKind::Trim);
        assert_eq!(config.evaluation.report_prefix, "fine-tuned");
        assert_eq!(config.augmentation.epochs, 10);
        assert_eq!(config.dataset.seed, 42);
        assert_eq!(config.provider.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_default_dataset_blocklist_is_populated() {
        let config = Config::default();
        assert!(config
            .dataset
            .excluded_texts
            .iter()
            .any(|text| text == "standby"));
    }

    #[test]
    fn test_save_and_load_roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.provider.name = Some("whisper-cpp".to_string());
        config.augmentation.seed = Some(7);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.provider.name.as_deref(), Some("whisper-cpp"));
        assert_eq!(loaded.augmentation.seed, Some(7));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
    }
}
