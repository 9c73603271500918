use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::ScrapeMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "court availability scraper")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the HTTP server (scrape trigger + dashboard)
    Serve {
        /// Port number (optional, defaults to 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },
    /// Run one scrape in the foreground
    Scrape {
        /// Which dates to cover
        #[arg(short, long, value_parser = ScrapeMode::NAMES)]
        mode: String,
        /// Date for single mode (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Write the dashboard for the current snapshots to a file
    Render {
        #[arg(short, long, default_value = "dashboard.html")]
        output: PathBuf,
    },
}
