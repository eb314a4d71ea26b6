//! `time_logs` table: the ledger of completed intervals.

use crate::db::RECORD_VERSION;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::time_log::{NewTimeLog, TimeLogEntry};
use crate::storage::traits::LedgerStore;
use rusqlite::{OptionalExtension, Result, Row, params};

const SELECT_COLUMNS: &str = "SELECT id, user_id, start_time, end_time, record_version FROM time_logs";

pub fn map_row(row: &Row) -> Result<(TimeLogEntry, i64)> {
    let entry = TimeLogEntry {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
    };
    Ok((entry, row.get("record_version")?))
}

fn checked(pair: (TimeLogEntry, i64)) -> AppResult<TimeLogEntry> {
    let (entry, version) = pair;
    if version != RECORD_VERSION {
        return Err(AppError::UnsupportedRecord(version));
    }
    Ok(entry)
}

impl LedgerStore for DbPool {
    fn insert_entry(&self, draft: &NewTimeLog) -> AppResult<TimeLogEntry> {
        self.conn.execute(
            "INSERT INTO time_logs (user_id, start_time, end_time, record_version)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                draft.user_id,
                draft.start_time,
                draft.end_time,
                RECORD_VERSION
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(draft.clone().into_entry(id))
    }

    fn get_entry(&self, id: i64) -> AppResult<Option<TimeLogEntry>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = self.conn.query_row(&sql, [id], map_row).optional()?;
        row.map(checked).transpose()
    }

    fn replace_entry(&self, entry: &TimeLogEntry) -> AppResult<bool> {
        let changed = self.conn.execute(
            "UPDATE time_logs SET start_time = ?1, end_time = ?2 WHERE id = ?3",
            params![entry.start_time, entry.end_time, entry.id],
        )?;
        Ok(changed == 1)
    }

    fn delete_entry(&self, id: i64) -> AppResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM time_logs WHERE id = ?1", [id])?;
        Ok(changed == 1)
    }

    fn list_entries(&self, user_id: Option<&str>) -> AppResult<Vec<TimeLogEntry>> {
        let mut out = Vec::new();

        match user_id {
            Some(u) => {
                let sql = format!(
                    "{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY start_time DESC, id DESC"
                );
                let mut stmt = self.conn.prepare_cached(&sql)?;
                for r in stmt.query_map([u], map_row)? {
                    out.push(checked(r?)?);
                }
            }
            None => {
                let sql = format!("{SELECT_COLUMNS} ORDER BY start_time DESC, id DESC");
                let mut stmt = self.conn.prepare_cached(&sql)?;
                for r in stmt.query_map([], map_row)? {
                    out.push(checked(r?)?);
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_replace_delete() {
        let pool = DbPool::open_in_memory().unwrap();
        let e = pool.insert_entry(&NewTimeLog::closed("u1", 10, 20)).unwrap();
        assert_eq!(pool.get_entry(e.id).unwrap(), Some(e.clone()));

        let mut changed = e.clone();
        changed.end_time = Some(50);
        assert!(pool.replace_entry(&changed).unwrap());
        assert_eq!(pool.get_entry(e.id).unwrap().unwrap().end_time, Some(50));

        assert!(pool.delete_entry(e.id).unwrap());
        assert!(!pool.delete_entry(e.id).unwrap());
        assert!(pool.get_entry(e.id).unwrap().is_none());
    }

    #[test]
    fn listing_is_newest_first_per_user() {
        let pool = DbPool::open_in_memory().unwrap();
        pool.insert_entry(&NewTimeLog::closed("u1", 10, 20)).unwrap();
        pool.insert_entry(&NewTimeLog::closed("u2", 15, 25)).unwrap();
        pool.insert_entry(&NewTimeLog::closed("u1", 30, 40)).unwrap();

        let starts: Vec<i64> = pool
            .list_entries(Some("u1"))
            .unwrap()
            .iter()
            .map(|e| e.start_time)
            .collect();
        assert_eq!(starts, vec![30, 10]);
        assert_eq!(pool.list_entries(None).unwrap().len(), 3);
    }
}
