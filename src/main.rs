use anyhow::Result;
use atc_eval::cli::{
    handle_augment_command, handle_dataset_command, handle_evaluate_command,
    handle_normalize_command, handle_provider_command, handle_wer_command, load_config, Cli,
    CliCommand,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        CliCommand::Version => {
            println!("atc-eval {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliCommand::Normalize(args) => handle_normalize_command(args),
        CliCommand::Wer(args) => handle_wer_command(args),
        CliCommand::Evaluate(args) => {
            let config = load_config(cli.config.as_deref())?;
            handle_evaluate_command(args, config).await
        }
        CliCommand::Dataset(args) => {
            handle_dataset_command(args, load_config(cli.config.as_deref())?)
        }
        CliCommand::Augment(args) => {
            handle_augment_command(args, load_config(cli.config.as_deref())?)
        }
        CliCommand::Provider(args) => {
            let config = load_config(cli.config.as_deref())?;
            handle_provider_command(args, config).await
        }
    }
}
