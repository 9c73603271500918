pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod errors;
pub mod http;
pub mod rate_limiter;
pub mod services;
pub mod session;
pub mod store;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use cli::Cli;
use log::info;
use std::path::Path;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::{RunSummary, ScrapeMode};
use crate::services::dashboard::DashboardService;
use crate::services::scrape::run_scrape;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env()?;
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_scrape(mode: &str, date: Option<NaiveDate>) -> Result<()> {
    let mode = ScrapeMode::from_parts(mode, date)?;
    let config = AppConfig::from_env()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(run_scrape(&config, &mode));

    match summary {
        RunSummary::Success {
            dates_processed,
            snapshots_saved,
            pairs_skipped,
        } => {
            info!(
                "✓ {} dates processed, {} snapshots saved, {} pairs skipped",
                dates_processed, snapshots_saved, pairs_skipped
            );
            Ok(())
        }
        RunSummary::Failed { reason } => anyhow::bail!("Scrape failed: {}", reason),
    }
}

pub fn handle_render(output: &Path) -> Result<()> {
    let config = AppConfig::from_env()?;
    let html = DashboardService::new(&config).render_html();

    std::fs::write(output, html)
        .with_context(|| format!("Failed to write dashboard to {}", output.display()))?;
    info!("✓ Dashboard generated: {}", output.display());
    Ok(())
}
