use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ensure that the `log` table exists. Applied migrations are recorded in it.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    id: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "20250301_0001_create_timers",
        description: "Created timers table (one open timer per user)",
        sql: r#"
        CREATE TABLE IF NOT EXISTS timers (
            user_id        TEXT PRIMARY KEY,
            started_at     INTEGER NOT NULL,
            record_version INTEGER NOT NULL DEFAULT 1
        );
        "#,
    },
    Migration {
        id: "20250301_0002_create_time_logs",
        description: "Created time_logs table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS time_logs (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        TEXT NOT NULL,
            start_time     INTEGER NOT NULL,
            end_time       INTEGER,
            record_version INTEGER NOT NULL DEFAULT 1,
            CHECK (end_time IS NULL OR end_time >= start_time)
        );

        CREATE INDEX IF NOT EXISTS idx_time_logs_user_start ON time_logs(user_id, start_time);
        "#,
    },
    Migration {
        id: "20250301_0003_create_users",
        description: "Created users table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id   TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user' CHECK(role IN ('admin','user'))
        );
        "#,
    },
];

fn is_applied(conn: &Connection, id: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([id], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.id, m.description],
    )?;
    tx.commit()?;
    info!(migration = m.id, "{}", m.description);
    Ok(())
}

/// IDs of the migrations recorded as applied, oldest first.
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if !is_applied(conn, m.id)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}
