use crate::cli::commands::audit;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::user::User;
use crate::storage::traits::UserDirectory;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
///  - optionally the first admin user
pub fn handle(cli: &Cli) -> AppResult<()> {
    if let Commands::Init { admin, name } = &cli.command {
        let db_path = Config::init_all(cli.db.clone(), cli.test)?;
        let db_str = db_path.to_string_lossy().to_string();

        info("Initializing timedesk…");
        if !cli.test {
            println!("📄 Config file : {}", Config::config_file().display());
        }
        println!("🗄️  Database   : {}", db_str);

        let pool = DbPool::open(&db_str)?;
        success(format!("Database initialized at {}", db_str));
        audit(&pool, "init", "", &format!("Database initialized at {}", db_str));

        if let Some(id) = admin {
            let display = name.clone().unwrap_or_else(|| id.clone());
            if pool.add_user(&User::admin(id.as_str(), display.as_str()))? {
                success(format!("Admin user '{id}' created"));
                audit(&pool, "user_add", id, &format!("admin {display}"));
            } else {
                info(format!("User '{id}' already exists"));
            }
        }
    }
    Ok(())
}
