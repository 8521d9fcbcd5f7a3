//! twledger library root.
//! Exposes the telework event ledger, the CLI parser and the high-level
//! run() function.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let json = cli.json;

    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Report { .. } | Commands::ReportLegacy { .. } | Commands::Edit { .. } => {
            cli::commands::report::handle(&cli.command, cfg, json)
        }
        Commands::Del { .. } | Commands::HolidayDel { .. } => {
            cli::commands::del::handle(&cli.command, cfg, json)
        }
        Commands::Holiday { .. } => cli::commands::holiday::handle(&cli.command, cfg, json),
        Commands::Latest { .. } | Commands::List { .. } => {
            cli::commands::list::handle(&cli.command, cfg, json)
        }
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Diagnostics go to stderr: `RUST_LOG` wins, then the config `log_level`.
fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("twledger={}", cfg.log_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // load config once
    let mut cfg = Config::load()?;
    init_tracing(&cfg);

    // --db overrides the configured database
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
