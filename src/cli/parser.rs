use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for timedesk
/// Workspace time tracking with per-user timers and a SQLite ledger
#[derive(Parser)]
#[command(
    name = "timedesk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clock in and out, review who is working, edit time logs and compute billable hours",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Act as this user id (defaults to `default_user` from the config)
    #[arg(global = true, long = "as", value_name = "USER_ID")]
    pub acting: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init {
        /// Seed the roster with this admin user id
        #[arg(long = "admin", value_name = "USER_ID")]
        admin: Option<String>,

        /// Display name for the seeded admin
        #[arg(long = "name", requires = "admin")]
        name: Option<String>,
    },

    /// Show or check the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Validate the configuration and list missing fields")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the user roster
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Start a timer for the acting user
    Start,

    /// Stop the acting user's timer and record the time log
    Stop,

    /// Start the timer if it is stopped, stop it otherwise
    Toggle,

    /// Show whether the acting user's timer is running
    Status,

    /// List users with a running timer
    Active {
        #[arg(long, help = "Keep refreshing the list")]
        watch: bool,

        #[arg(long, value_name = "N", requires = "watch", help = "Stop after N refreshes")]
        ticks: Option<u32>,
    },

    /// Stop another user's timer (admin only)
    ForceStop {
        /// User whose timer should be stopped
        user_id: String,
    },

    /// Review and edit time logs (admin only)
    Logs {
        #[command(subcommand)]
        action: LogsAction,
    },

    /// Billable hours for one user over a date range
    Payroll {
        #[arg(long, value_name = "USER_ID")]
        user: Option<String>,

        #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "range")]
        from: Option<String>,

        #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "range")]
        to: Option<String>,

        #[arg(
            long,
            value_name = "RANGE",
            help = "YYYY, YYYY-MM, YYYY-MM-DD or START:END of the same form"
        )]
        range: Option<String>,

        #[arg(long, help = "Print the report as JSON")]
        json: bool,

        #[arg(long, help = "Keep recomputing while a timer is running")]
        watch: bool,

        #[arg(long, value_name = "N", requires = "watch", help = "Stop after N reports, the first one included")]
        ticks: Option<u32>,
    },

    /// Export time logs
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, value_name = "USER_ID")]
        user: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Add a user (admin only, or anyone while the roster is empty)
    Add {
        id: String,
        name: String,
        #[arg(long, default_value = "user", help = "admin or user")]
        role: String,
    },

    /// List the roster
    List,

    /// Remove a user (admin only)
    Remove { id: String },

    /// Change a user's role (admin only)
    Role { id: String, role: String },
}

#[derive(Subcommand)]
pub enum LogsAction {
    /// List time logs, newest first, including running timers
    List {
        #[arg(long, value_name = "USER_ID")]
        user: Option<String>,
    },

    /// Edit the start and/or end of a time log
    Edit {
        id: i64,

        #[arg(
            long,
            value_name = "DATETIME",
            help = "RFC 3339 or local 'YYYY-MM-DD HH:MM' (America/Denver)"
        )]
        start: Option<String>,

        #[arg(long, value_name = "DATETIME")]
        end: Option<String>,
    },

    /// Delete a time log
    Del { id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["timedesk", "start", "--as", "u1", "--db", "/tmp/t.sqlite"])
            .unwrap();
        assert_eq!(cli.acting.as_deref(), Some("u1"));
        assert!(matches!(cli.command, Commands::Start));
    }

    #[test]
    fn payroll_range_conflicts_with_dates() {
        assert!(
            Cli::try_parse_from([
                "timedesk", "payroll", "--user", "u1", "--from", "2025-02-01", "--range", "2025-02"
            ])
            .is_err()
        );
    }
}
