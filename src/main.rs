use anyhow::Result;

use court_watch::cli::Command;
use court_watch::{handle_render, handle_scrape, handle_serve, interpret};

fn main() {
    setup_logging();
    load_env_file();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn load_env_file() {
    // A missing .env is fine; settings fall back to defaults.
    let _ = dotenv::dotenv();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Scrape { mode, date } => handle_scrape(mode, *date),
        Command::Render { output } => handle_render(output),
    }
}
