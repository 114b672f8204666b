//! Courier command-line binary.

mod cli;
mod commands;

use clap::Parser;
use courier_infrastructure::SettingsRepository;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let output = match &cli.command {
        Command::Import(args) => commands::import(args).await?,
        Command::Send(args) => {
            let repository = cli
                .settings
                .clone()
                .map_or_else(SettingsRepository::new, SettingsRepository::with_path);
            let settings = repository.load().await?;
            commands::send(args, settings).await?
        }
    };
    print!("{output}");
    Ok(())
}
