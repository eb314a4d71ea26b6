// src/export/logic.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::TimeLogExport;
use crate::export::range::parse_range;
use crate::models::time_log::{LogFilter, TimeLogEntry};
use crate::storage::traits::{LedgerStore, UserDirectory};
use crate::ui::messages::warning;
use std::path::Path;

/// High-level export of ledger entries.
pub struct ExportLogic;

impl ExportLogic {
    /// Export ledger rows, oldest first.
    ///
    /// - `file`: absolute output path
    /// - `range`: `None`, `"all"` or any expression accepted by [`parse_range`]
    /// - `user`: restrict to one user id
    ///
    /// Returns the number of rows written.
    pub fn export<S: LedgerStore + UserDirectory + ?Sized>(
        store: &S,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        user: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        let rows = Self::collect(store, range, user)?;
        if rows.is_empty() {
            warning("No time logs found for the selected range.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }

    /// Rows that an export with these filters would write.
    pub fn collect<S: LedgerStore + UserDirectory + ?Sized>(
        store: &S,
        range: Option<&str>,
        user: Option<&str>,
    ) -> AppResult<Vec<TimeLogExport>> {
        let mut filter = LogFilter {
            user_id: user.map(str::to_string),
            date_range: None,
        };
        if let Some(r) = range
            && !r.eq_ignore_ascii_case("all")
        {
            filter = filter.with_range(parse_range(r)?);
        }

        let mut entries: Vec<TimeLogEntry> = store
            .list_entries(user)?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        entries.sort_by_key(|e| (e.start_time, e.id));

        let roster = store.list_users()?;
        Ok(entries
            .iter()
            .map(|e| TimeLogExport::from_entry(e, &roster))
            .collect())
    }
}
