//! CLI handler for transcription provider inspection.
//!
//! Terminal presentation only; the checks live in the `transcription` module.

use anyhow::{anyhow, Result};

use crate::cli::{ProviderCliArgs, ProviderCommand};
use crate::config::Config;
use crate::transcription::{
    get_provider_info, get_provider_status, test_provider_with_config, ProviderStatus,
};

pub async fn handle_provider_command(args: ProviderCliArgs, config: Config) -> Result<()> {
    match args.command {
        ProviderCommand::Show => handle_show(&config),
        ProviderCommand::Status => handle_status(&config),
        ProviderCommand::Test { file } => {
            let provider_name = config.provider.name.as_deref().ok_or_else(|| {
                anyhow!("No transcription provider configured. Set [provider].name in the config.")
            })?;
            if let Some(path) = &file {
                if !path.exists() {
                    return Err(anyhow!("Audio file not found: {}", path.display()));
                }
            }

            println!();
            println!("Provider Test");
            println!("=============");
            println!();
            println!("Provider: {}", provider_name);

            let result = test_provider_with_config(&config.provider, file.as_deref()).await?;
            if let Some(error) = result.error {
                println!();
                println!("Error: {}", error);
                return Err(anyhow!("Provider '{}' failed the test", provider_name));
            }

            match result.transcription {
                Some(text) => {
                    println!("Transcribed in {:.2}s", result.duration_secs);
                    println!();
                    println!("Result:");
                    println!("  \"{}\"", text);
                }
                None => {
                    println!();
                    println!("Provider '{}' initialized successfully.", provider_name);
                    println!();
                    println!("To test with actual audio:");
                    println!("  atc-eval provider test --file <audio.wav>");
                }
            }
            println!();
            Ok(())
        }
    }
}

fn handle_show(config: &Config) -> Result<()> {
    let info = get_provider_info(&config.provider);

    println!();
    println!("Provider Configuration");
    println!("======================");
    println!();
    println!("Provider:     {}", display_value(&info.provider));
    println!("Model:        {}", display_value(&info.model));
    println!("Language:     {}", display_value(&info.language));
    println!();
    println!("API Settings:");
    println!(
        "  Key:        {}",
        mask_secret(config.provider.api_key.as_deref())
    );
    println!("  Endpoint:   {}", display_value(&info.api_endpoint));
    println!();
    println!("Local Binary Settings:");
    println!("  Command:    {}", display_value(&info.command_path));
    println!("  Model Path: {}", display_value(&info.model_path));
    println!();

    Ok(())
}

fn handle_status(config: &Config) -> Result<()> {
    println!();
    match get_provider_status(&config.provider) {
        ProviderStatus::Ready {
            provider,
            model,
            language,
        } => {
            println!("Status: READY");
            println!();
            println!("Provider:  {}", provider);
            println!("Model:     {}", model.as_deref().unwrap_or("<default>"));
            println!("Language:  {}", language.as_deref().unwrap_or("<default>"));
        }
        ProviderStatus::ConfigError { provider, error } => {
            println!("Status: CONFIGURATION ERROR");
            println!();
            println!("Provider:  {}", provider);
            println!("Error:     {}", error);
        }
        ProviderStatus::NotConfigured => {
            println!("Status: NOT CONFIGURED");
            println!();
            println!("Set [provider].name in the config file.");
        }
    }
    println!();
    Ok(())
}

fn display_value(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<not set>")
}

/// Show only the last four characters of a secret.
fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        None => "<not set>".to_string(),
        Some(s) if s.chars().count() <= 4 => "****".to_string(),
        Some(s) => {
            let tail: String = s.chars().skip(s.chars().count() - 4).collect();
            format!("****{}", tail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(None), "<not set>");
        assert_eq!(mask_secret(Some("abc")), "****");
        assert_eq!(mask_secret(Some("sk-1234567890")), "****7890");
    }
}
