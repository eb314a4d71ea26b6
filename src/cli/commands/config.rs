use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        if *print_config {
            println!("📄 Current configuration:\n");
            let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
            println!("{}", yaml);
        }

        if *check {
            let path = Config::config_file();
            if !path.exists() {
                warning(format!(
                    "No configuration file at {}; defaults are in use",
                    path.display()
                ));
                return cfg.validate();
            }

            let content = fs::read_to_string(&path)?;
            let missing = Config::missing_fields(&content)?;
            if missing.is_empty() {
                info("All configuration fields are present");
            } else {
                warning(format!(
                    "Missing fields (defaults applied): {}",
                    missing.join(", ")
                ));
            }

            cfg.validate()?;
            success(format!("Configuration {} is valid", path.display()));
        }
    }

    Ok(())
}
