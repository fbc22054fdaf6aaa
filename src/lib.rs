pub mod api;
pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::FundQuery;
use crate::providers::{HistoryCache, YahooHistoryProvider};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    /// Serve the HTTP API
    Serve {
        bind: Option<String>,
        data_path: Option<PathBuf>,
    },
    /// Run one query and print it
    Query {
        query: FundQuery,
        data_path: Option<PathBuf>,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Wires the API state from config: dataset location and the market data
/// provider with its response cache.
pub fn build_state(config: &AppConfig, data_path: PathBuf) -> api::AppState {
    let cache = Arc::new(HistoryCache::with_ttl(Duration::from_secs(
        config.server.history_ttl_secs,
    )));
    let provider = YahooHistoryProvider::new(config.yahoo_base_url(), cache);
    api::AppState::new(data_path, Arc::new(provider))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;

    match command {
        AppCommand::Serve { bind, data_path } => {
            let data_path = data_path.unwrap_or_else(|| PathBuf::from(&config.data_path));
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            info!("Fund catalog starting...");
            api::serve(&bind, build_state(&config, data_path)).await
        }
        AppCommand::Query { query, data_path } => {
            let data_path = data_path.unwrap_or_else(|| PathBuf::from(&config.data_path));
            cli::query::run(&data_path, &query).await
        }
    }
}
