use crate::cli::commands::{acting_user, audit, open_pool};
use crate::cli::parser::{Cli, Commands};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::core::tracker::{TimeTracker, Toggle};
use crate::errors::AppResult;
use crate::models::time_log::TimeLogEntry;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::format_local_datetime;
use crate::utils::formatting::{duration_label, hms};

fn report_stopped(entry: &TimeLogEntry) {
    success(format!(
        "Timer stopped: {} → {} ({})",
        format_local_datetime(entry.start_time),
        entry
            .end_time
            .map(format_local_datetime)
            .unwrap_or_default(),
        duration_label(entry.start_time, entry.end_time)
    ));
}

/// `start`, `stop`, `toggle`, `status` and `force-stop`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let acting = acting_user(cli, cfg, &pool)?;
    let tracker = TimeTracker::new(&pool, SystemClock);

    match &cli.command {
        Commands::Start => {
            let marker = tracker.start(&acting.id)?;
            success(format!(
                "Timer started for {} at {}",
                acting.name,
                format_local_datetime(marker.started_at)
            ));
            audit(&pool, "start", &acting.id, "timer started");
        }

        Commands::Stop => match tracker.stop(&acting.id)? {
            Some(entry) => {
                report_stopped(&entry);
                audit(
                    &pool,
                    "stop",
                    &acting.id,
                    &format!("time log #{} recorded", entry.id),
                );
            }
            None => info(format!("No timer is running for {}", acting.name)),
        },

        Commands::Toggle => match tracker.toggle(&acting.id)? {
            Toggle::Started(marker) => {
                success(format!(
                    "Timer started for {} at {}",
                    acting.name,
                    format_local_datetime(marker.started_at)
                ));
                audit(&pool, "start", &acting.id, "timer started (toggle)");
            }
            Toggle::Stopped(Some(entry)) => {
                report_stopped(&entry);
                audit(
                    &pool,
                    "stop",
                    &acting.id,
                    &format!("time log #{} recorded (toggle)", entry.id),
                );
            }
            Toggle::Stopped(None) => info("Timer was already stopped elsewhere"),
        },

        Commands::Status => {
            let timers = tracker.timers();
            match timers.running_since(&acting.id)? {
                Some(started_at) => println!(
                    "⏱️  {} — running since {} ({})",
                    acting.name,
                    format_local_datetime(started_at),
                    hms(timers.now_ms() - started_at)
                ),
                None => println!("⏸️  {} — not running", acting.name),
            }
        }

        Commands::ForceStop { user_id } => match tracker.force_stop(user_id, &acting)? {
            Some(entry) => {
                report_stopped(&entry);
                audit(
                    &pool,
                    "force_stop",
                    user_id,
                    &format!("time log #{} recorded by {}", entry.id, acting.id),
                );
            }
            None => warning(format!("No timer is running for {user_id}")),
        },

        _ => {}
    }

    Ok(())
}
