pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod kick;
pub mod logging;
pub mod simulation;
pub mod utils;

use std::sync::Arc;
use log::{info, warn};
use tokio::io::BufReader;
use tokio::sync::RwLock;
use crate::config::Config;
use crate::dashboard::{run_dashboard, Dashboard};
use crate::kick::KickPublicClient;
use crate::simulation::{RandomSource, RngSource};

pub struct WatchClients {
    pub dashboard: Dashboard,
    pub public_client: KickPublicClient,
}

pub async fn init(
    config: Arc<RwLock<Config>>,
    channel: Option<String>,
    seed: Option<u64>,
) -> Result<WatchClients, Box<dyn std::error::Error + Send + Sync>> {
    let config = config.read().await;
    let channel = match channel {
        Some(channel) => channel,
        None => config.require_channel()?.to_string(),
    };

    let rng: Box<dyn RandomSource + Send> = match seed.or(config.simulation.seed) {
        Some(seed) => {
            info!("Using simulation seed {}", seed);
            Box::new(RngSource::seeded(seed))
        }
        None => Box::new(RngSource::from_entropy()),
    };

    let dashboard = Dashboard::new(channel, &config.simulation, rng)?;
    let public_client = KickPublicClient::new(&config.public_api_url, config.request_timeout())?;

    Ok(WatchClients { dashboard, public_client })
}

pub async fn run(mut clients: WatchClients, config: Arc<RwLock<Config>>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let intervals = config.read().await.intervals.clone();
    let controls = BufReader::new(tokio::io::stdin());
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Unable to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    run_dashboard(&mut clients.dashboard, &clients.public_client, &intervals, controls, shutdown).await?;
    info!("Dashboard has shut down.");
    Ok(())
}
