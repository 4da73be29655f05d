pub mod cli;
pub mod core;

use crate::cli::context::{Dashboard, PeriodRequest};
use crate::core::config::AppConfig;
use crate::core::views::top_traders::RankMode;
use anyhow::{Result, bail};
use std::path::Path;
use tracing::{debug, info};

pub enum AppCommand {
    Periods { json: bool },
    Overview,
    Custody { broker: Option<String> },
    BuyersSellers { broker: Option<String> },
    Top { mode: RankMode, top_n: Option<usize> },
    Weekly { top_n: Option<usize> },
}

/// Options shared by every dashboard command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<String>,
    pub data_path: Option<String>,
    pub period: PeriodRequest,
    /// Skip business-day filling regardless of the config.
    pub raw: bool,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) if !Path::new(path).exists() => {
            bail!("Config file not found: {path}")
        }
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

pub fn run_command(command: AppCommand, options: &RunOptions) -> Result<()> {
    info!("Broker barometer starting...");

    let mut config = load_config(options.config_path.as_deref())?;
    if options.raw {
        config.fill_business_days = false;
    }
    debug!("Loaded config: {config:#?}");

    let dashboard = Dashboard::load(config, options.data_path.as_deref(), &options.period)?;
    let default_top_n = dashboard.config.top_n;

    match command {
        AppCommand::Periods { json } => cli::periods::run(&dashboard, json),
        AppCommand::Overview => cli::overview::run(&dashboard),
        AppCommand::Custody { broker } => cli::custody::run(&dashboard, broker.as_deref()),
        AppCommand::BuyersSellers { broker } => {
            cli::buyers_sellers::run(&dashboard, broker.as_deref())
        }
        AppCommand::Top { mode, top_n } => {
            cli::top::run(&dashboard, mode, top_n.unwrap_or(default_top_n))
        }
        AppCommand::Weekly { top_n } => {
            cli::weekly::run(&dashboard, top_n.unwrap_or(default_top_n))
        }
    }
}
