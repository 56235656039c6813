mod config;
mod dispatcher;
mod error;
mod format;
mod handlers;
mod server;
mod speech;
mod telegram;
mod update;
mod weather;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::dispatcher::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,weatherbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if config.bot_token().is_none() {
        warn!("No Telegram bot token configured; updates will be acknowledged and ignored");
    }
    info!("  Telegram API: {}", config.telegram.api_url);
    info!("  Weather API: {}", config.weather.api_url);
    info!("  Voice: {}", config.speech.voice);

    let state = Arc::new(AppState::new(config));

    info!("Bot is starting...");
    server::run(state).await?;

    Ok(())
}
