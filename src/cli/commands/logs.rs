use crate::cli::commands::{acting_user, audit, open_pool};
use crate::cli::parser::{Cli, Commands, LogsAction};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::core::admin::AdminTimeLogEditor;
use crate::errors::AppResult;
use crate::models::time_log::TimeLogPatch;
use crate::models::user::UNKNOWN_USER_NAME;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{colorize_name, colorize_running};
use crate::utils::date::parse_local_datetime;
use crate::utils::formatting::pad_right;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Logs { action } = &cli.command else {
        return Ok(());
    };

    let pool = open_pool(cfg)?;
    let acting = acting_user(cli, cfg, &pool)?;
    let acting_id = acting.id.clone();
    let editor = AdminTimeLogEditor::new(&pool, SystemClock, acting);

    match action {
        LogsAction::List { user } => {
            let rows = editor.list(user.as_deref())?;
            if rows.is_empty() {
                info("No time logs found.");
                return Ok(());
            }

            println!(
                "{} {} {} {} {} DURATION",
                pad_right("ID", 6),
                pad_right("USER", 22),
                pad_right("DATE", 11),
                pad_right("START", 22),
                pad_right("END", 22),
            );
            for r in rows {
                let running = r.entry.is_running();
                let id = if running {
                    "-".to_string()
                } else {
                    r.entry.id.to_string()
                };
                let known = r.user_name != UNKNOWN_USER_NAME;
                println!(
                    "{} {} {} {} {} {}",
                    pad_right(&id, 6),
                    colorize_name(&pad_right(&r.user_name, 22), known),
                    pad_right(&r.date, 11),
                    pad_right(&r.start, 22),
                    colorize_running(&pad_right(&r.end, 22), running),
                    colorize_running(&r.duration, running),
                );
            }
        }

        LogsAction::Edit { id, start, end } => {
            let patch = TimeLogPatch {
                start_time: start.as_deref().map(parse_local_datetime).transpose()?,
                end_time: end.as_deref().map(parse_local_datetime).transpose()?,
            };
            if patch.is_empty() {
                warning("Nothing to change: pass --start and/or --end");
                return Ok(());
            }

            let saved = editor.edit(*id, &patch)?;
            success(format!("Time log #{} updated", saved.id));
            audit(
                &pool,
                "edit",
                &saved.user_id,
                &format!("time log #{} by {}", saved.id, acting_id),
            );

            let overlaps = editor.overlaps(&saved)?;
            if !overlaps.is_empty() {
                let ids: Vec<String> = overlaps.iter().map(|e| format!("#{}", e.id)).collect();
                warning(format!(
                    "Time log #{} overlaps {} for the same user",
                    saved.id,
                    ids.join(", ")
                ));
            }
        }

        LogsAction::Del { id } => {
            if editor.delete(*id)? {
                success(format!("Time log #{id} deleted"));
                audit(&pool, "del", &id.to_string(), &format!("by {acting_id}"));
            } else {
                warning(format!("Time log #{id} not found"));
            }
        }
    }

    Ok(())
}
