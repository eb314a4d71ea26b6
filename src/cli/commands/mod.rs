pub mod active;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod log;
pub mod logs;
pub mod payroll;
pub mod timer;
pub mod user;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use crate::storage::traits::UserDirectory;
use crate::ui::messages::warning;

/// Open the configured database, applying pending migrations.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    DbPool::open(&cfg.database_path().to_string_lossy())
}

/// `--as`, then `default_user`; the id must be on the roster.
pub(crate) fn acting_user(cli: &Cli, cfg: &Config, pool: &DbPool) -> AppResult<User> {
    let id = cli
        .acting
        .clone()
        .or_else(|| cfg.default_user.clone())
        .ok_or(AppError::NoActingUser)?;

    pool.find_user(&id)?.ok_or(AppError::UnknownUser(id))
}

/// Write an audit line; a failure here never fails the command.
pub(crate) fn audit(pool: &DbPool, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(&pool.conn, operation, target, message) {
        warning(format!("Failed to write internal log: {e}"));
    }
}

/// Block until the refresh loop has reported `ticks` redraws, or forever
/// (until the process is interrupted) when no limit is given.
pub(crate) fn wait_for_ticks(done: &std::sync::mpsc::Receiver<()>, ticks: Option<u32>) {
    match ticks {
        Some(n) => {
            for _ in 0..n {
                if done.recv().is_err() {
                    break;
                }
            }
        }
        None => while done.recv().is_ok() {},
    }
}
