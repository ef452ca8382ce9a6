use clap::Parser;
use log::info;
use kickwatch::cli::{Cli, Command};
use kickwatch::{commands, config::Config, init, logging, run};
use std::sync::Arc;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    logging::setup_logger(cli.log_level.unwrap_or(config.log_level))?;
    if !config.is_persisted() {
        info!("No config found at {:?}, using defaults", config.path());
    }
    let config = Arc::new(RwLock::new(config));

    match cli.command {
        Command::Watch { channel, seed } => {
            let clients = init(Arc::clone(&config), channel, seed).await?;
            run(clients, config).await?;
        }
        command => commands::execute(command, config).await?,
    }

    Ok(())
}
