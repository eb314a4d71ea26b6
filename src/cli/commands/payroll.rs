use crate::cli::commands::{acting_user, open_pool, wait_for_ticks};
use crate::cli::parser::{Cli, Commands};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::core::payroll::{PayrollReport, PayrollReportEngine};
use crate::core::permissions::require_admin;
use crate::core::refresh::spawn_refresh;
use crate::errors::{AppError, AppResult};
use crate::export::parse_range;
use crate::models::time_log::DateRange;
use crate::storage::traits::UserDirectory;
use crate::utils::colors::{RESET, color_for_hours};
use crate::utils::date::{parse_date, today};
use crate::utils::formatting::{bold, hours2readable};
use std::sync::mpsc;

fn resolve_range(
    from: Option<&str>,
    to: Option<&str>,
    range: Option<&str>,
) -> AppResult<DateRange> {
    if let Some(r) = range {
        return parse_range(r);
    }
    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        (None, None) => return Ok(DateRange::single(today(SystemClock.now_ms()))),
        _ => {
            return Err(AppError::InvalidDateRange(
                "pass both --from and --to, or --range".to_string(),
            ));
        }
    };
    let start = parse_date(from)
        .ok_or_else(|| AppError::InvalidDateRange(format!("invalid start date '{from}'")))?;
    let end = parse_date(to)
        .ok_or_else(|| AppError::InvalidDateRange(format!("invalid end date '{to}'")))?;
    DateRange::new(start, end)
}

fn print_report(report: &PayrollReport, name: &str, json: bool) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }
    let running = if report.includes_running {
        " (includes a running timer)"
    } else {
        ""
    };
    println!(
        "💰 {} {} → {}: {}{}{} h over {} entr{}{}",
        bold(name),
        report.start.format("%Y-%m-%d"),
        report.end.format("%Y-%m-%d"),
        color_for_hours(report.hours),
        hours2readable(report.hours),
        RESET,
        report.entries,
        if report.entries == 1 { "y" } else { "ies" },
        running
    );
    Ok(())
}

/// Members may report on themselves; admins on anyone. Without dates the
/// report covers today.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Payroll {
        user,
        from,
        to,
        range,
        json,
        watch,
        ticks,
    } = &cli.command
    else {
        return Ok(());
    };

    let pool = open_pool(cfg)?;
    let acting = acting_user(cli, cfg, &pool)?;
    let user_id = user.clone().unwrap_or_else(|| acting.id.clone());
    if user_id != acting.id {
        require_admin(&acting, "payroll for another user")?;
    }

    let range = resolve_range(from.as_deref(), to.as_deref(), range.as_deref())?;
    let name = pool
        .find_user(&user_id)?
        .map(|u| u.name)
        .unwrap_or_else(|| user_id.clone());

    let report = PayrollReportEngine::new(&pool, SystemClock).report(&user_id, range)?;
    print_report(&report, &name, *json)?;

    // the report above is the first tick
    let remaining = ticks.map(|n| n.saturating_sub(1));
    if !*watch || !report.includes_running || remaining == Some(0) {
        return Ok(());
    }

    // Recompute once per refresh interval while the open timer keeps counting.
    let json = *json;
    let mut printed_initial = true;
    let (tx, rx) = mpsc::channel();
    let handle = spawn_refresh("payroll-refresh", cfg.refresh_interval(), move || {
        // spawn_refresh ticks immediately; that report is already on screen
        if std::mem::take(&mut printed_initial) {
            return Ok(());
        }
        let report = PayrollReportEngine::new(&pool, SystemClock).report(&user_id, range)?;
        print_report(&report, &name, json)?;
        let _ = tx.send(());
        Ok(())
    })?;

    wait_for_ticks(&rx, remaining);
    drop(handle);
    Ok(())
}
