pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::convert::ConvertRequest;
use crate::core::config::AppConfig;
use crate::providers::ExchangeRateApiProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert(ConvertRequest),
    Currencies,
    Interactive,
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?
            .with_env_overrides(|key| std::env::var(key).ok()),
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {:?}", config.defaults);
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = load_config(config_path)?;
    let provider = ExchangeRateApiProvider::new(config.api);

    match command {
        AppCommand::Convert(request) => {
            cli::convert::run(&request, config.defaults, &provider).await
        }
        AppCommand::Currencies => cli::currencies::run(),
        AppCommand::Interactive => cli::interactive::run(config.defaults, Arc::new(provider)).await,
    }
}
