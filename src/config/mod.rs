use crate::errors::{AppError, AppResult};
use crate::utils::date::REFERENCE_TZ_NAME;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Environment override for the configuration directory (used by tests).
pub const HOME_ENV: &str = "TIMEDESK_HOME";

const KNOWN_FIELDS: [&str; 5] = [
    "database",
    "timezone",
    "poll_interval_secs",
    "refresh_interval_secs",
    "default_user",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Acting user when `--as` is not given.
    #[serde(default)]
    pub default_user: Option<String>,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_timezone() -> String {
    REFERENCE_TZ_NAME.to_string()
}
fn default_poll_interval() -> u64 {
    2
}
fn default_refresh_interval() -> u64 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            timezone: default_timezone(),
            poll_interval_secs: default_poll_interval(),
            refresh_interval_secs: default_refresh_interval(),
            default_user: None,
        }
    }
}

impl Config {
    /// `$TIMEDESK_HOME`, or `~/.timedesk` (`%APPDATA%\timedesk` on Windows)
    pub fn config_dir() -> PathBuf {
        if let Ok(custom) = env::var(HOME_ENV)
            && !custom.is_empty()
        {
            return PathBuf::from(custom);
        }
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("timedesk")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".timedesk")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timedesk.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timedesk.sqlite")
    }

    /// Load the configuration file, or defaults if there is none.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let cfg = Self::from_yaml(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("cannot parse configuration: {e}")))
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.timezone != REFERENCE_TZ_NAME {
            return Err(AppError::Config(format!(
                "unsupported timezone '{}': only {REFERENCE_TZ_NAME} is supported",
                self.timezone
            )));
        }
        if self.poll_interval_secs == 0 || self.refresh_interval_secs == 0 {
            return Err(AppError::Config(
                "poll and refresh intervals must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Database path with a leading `~/` expanded.
    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Known fields absent from a YAML document (they fall back to defaults).
    pub fn missing_fields(content: &str) -> AppResult<Vec<&'static str>> {
        let yaml: Value = serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("cannot parse configuration: {e}")))?;

        let Some(map) = yaml.as_mapping() else {
            return Ok(KNOWN_FIELDS.to_vec());
        };

        Ok(KNOWN_FIELDS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(*k))
            .collect())
    }

    /// Create the config directory, write the config file (unless `is_test`)
    /// and return the database path to initialise.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| AppError::Config(e.to_string()))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(db_path)
    }
}
