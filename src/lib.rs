//! timedesk library root.
//! Per-user timers, the time-log ledger, active-users presence and payroll,
//! plus the CLI parser and the high-level run() function.

pub mod cli;
pub mod clock;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod storage;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init { .. } => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::User { .. } => cli::commands::user::handle(cli, cfg),
        Commands::Start
        | Commands::Stop
        | Commands::Toggle
        | Commands::Status
        | Commands::ForceStop { .. } => cli::commands::timer::handle(cli, cfg),
        Commands::Active { .. } => cli::commands::active::handle(&cli.command, cfg),
        Commands::Logs { .. } => cli::commands::logs::handle(cli, cfg),
        Commands::Payroll { .. } => cli::commands::payroll::handle(cli, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // `init` may run before a valid config exists
    let mut cfg = match (&cli.command, Config::load()) {
        (_, Ok(cfg)) => cfg,
        (Commands::Init { .. }, Err(e)) => {
            tracing::warn!("ignoring unreadable configuration during init: {e}");
            Config::default()
        }
        (_, Err(e)) => return Err(e),
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
