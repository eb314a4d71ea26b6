use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::date::format_local_date;
use rusqlite::OptionalExtension;
use std::fs;

/// Headline numbers for `db --info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbStats {
    pub time_logs: i64,
    pub open_timers: i64,
    pub users: i64,
    pub first_start: Option<i64>,
    pub last_start: Option<i64>,
}

pub fn collect(pool: &DbPool) -> rusqlite::Result<DbStats> {
    let count = |sql: &str| -> rusqlite::Result<i64> { pool.conn.query_row(sql, [], |r| r.get(0)) };

    let first_start: Option<i64> = pool
        .conn
        .query_row("SELECT MIN(start_time) FROM time_logs", [], |row| row.get(0))
        .optional()?
        .flatten();
    let last_start: Option<i64> = pool
        .conn
        .query_row("SELECT MAX(start_time) FROM time_logs", [], |row| row.get(0))
        .optional()?
        .flatten();

    Ok(DbStats {
        time_logs: count("SELECT COUNT(*) FROM time_logs")?,
        open_timers: count("SELECT COUNT(*) FROM timers")?,
        users: count("SELECT COUNT(*) FROM users")?,
        first_start,
        last_start,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    let stats = collect(pool)?;

    println!(
        "{}• Time logs:{} {}{}{}",
        CYAN, RESET, GREEN, stats.time_logs, RESET
    );
    println!(
        "{}• Open timers:{} {}{}{}",
        CYAN, RESET, GREEN, stats.open_timers, RESET
    );
    println!("{}• Users:{} {}{}{}", CYAN, RESET, GREEN, stats.users, RESET);

    let fmt = |v: Option<i64>| {
        v.map(format_local_date)
            .unwrap_or_else(|| format!("{GREY}--{RESET}"))
    };

    println!("{}• Date range (America/Denver):{}", CYAN, RESET);
    println!("    from: {}", fmt(stats.first_start));
    println!("    to:   {}", fmt(stats.last_start));

    println!();
    Ok(())
}
