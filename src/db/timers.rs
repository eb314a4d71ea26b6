//! `timers` table: one durable marker per user with an open timer.

use crate::db::RECORD_VERSION;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::timer::TimerMarker;
use crate::storage::traits::TimerMarkerStore;
use rusqlite::{OptionalExtension, params};

fn check_version(version: i64) -> AppResult<()> {
    if version != RECORD_VERSION {
        return Err(AppError::UnsupportedRecord(version));
    }
    Ok(())
}

impl TimerMarkerStore for DbPool {
    fn get_marker(&self, user_id: &str) -> AppResult<Option<TimerMarker>> {
        let row: Option<(i64, i64)> = self
            .conn
            .query_row(
                "SELECT started_at, record_version FROM timers WHERE user_id = ?1",
                [user_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((started_at, version)) => {
                check_version(version)?;
                Ok(Some(TimerMarker::new(user_id, started_at)))
            }
            None => Ok(None),
        }
    }

    fn put_marker_if_absent(&self, marker: &TimerMarker) -> AppResult<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO timers (user_id, started_at, record_version)
             VALUES (?1, ?2, ?3)",
            params![marker.user_id, marker.started_at, RECORD_VERSION],
        )?;
        Ok(changed == 1)
    }

    fn take_marker(&self, user_id: &str) -> AppResult<Option<TimerMarker>> {
        // DELETE ... RETURNING: the row goes to exactly one caller
        let row: Option<(i64, i64)> = self
            .conn
            .query_row(
                "DELETE FROM timers WHERE user_id = ?1 RETURNING started_at, record_version",
                [user_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((started_at, version)) => {
                check_version(version)?;
                Ok(Some(TimerMarker::new(user_id, started_at)))
            }
            None => Ok(None),
        }
    }

    fn list_markers(&self) -> AppResult<Vec<TimerMarker>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT user_id, started_at, record_version FROM timers ORDER BY user_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for r in rows {
            let (user_id, started_at, version) = r?;
            check_version(version)?;
            out.push(TimerMarker::new(user_id, started_at));
        }
        Ok(out)
    }
}
