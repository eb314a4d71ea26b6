//! Storage traits
//!
//! The time-tracking core only talks to these interfaces, so it runs the same
//! against the SQLite database and against the in-memory store used by tests.
//! All methods take `&self`: implementations own their interior mutability.

use crate::errors::AppResult;
use crate::models::role::Role;
use crate::models::time_log::{NewTimeLog, TimeLogEntry};
use crate::models::timer::TimerMarker;
use crate::models::user::User;

/// Per-user open-timer markers (key → start instant).
pub trait TimerMarkerStore {
    /// Read the marker for one user.
    fn get_marker(&self, user_id: &str) -> AppResult<Option<TimerMarker>>;

    /// Write the marker only if the user has none. Returns false when one exists.
    fn put_marker_if_absent(&self, marker: &TimerMarker) -> AppResult<bool>;

    /// Remove and return the marker in one step. Concurrent callers never both
    /// receive the same marker.
    fn take_marker(&self, user_id: &str) -> AppResult<Option<TimerMarker>>;

    /// Every open marker, ordered by user id.
    fn list_markers(&self) -> AppResult<Vec<TimerMarker>>;
}

/// Ordered collection of time log entries.
pub trait LedgerStore {
    /// Store a new entry and return it with its assigned id.
    fn insert_entry(&self, draft: &NewTimeLog) -> AppResult<TimeLogEntry>;

    fn get_entry(&self, id: i64) -> AppResult<Option<TimeLogEntry>>;

    /// Overwrite start/end of an existing entry. Returns false when absent.
    fn replace_entry(&self, entry: &TimeLogEntry) -> AppResult<bool>;

    /// Returns false when absent.
    fn delete_entry(&self, id: i64) -> AppResult<bool>;

    /// Entries newest first, optionally restricted to one user.
    fn list_entries(&self, user_id: Option<&str>) -> AppResult<Vec<TimeLogEntry>>;
}

/// Users collaborator.
pub trait UserDirectory {
    fn list_users(&self) -> AppResult<Vec<User>>;

    fn find_user(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.list_users()?.into_iter().find(|u| u.id == id))
    }

    /// Returns false when the id is taken.
    fn add_user(&self, user: &User) -> AppResult<bool>;

    /// Returns false when absent.
    fn remove_user(&self, id: &str) -> AppResult<bool>;

    /// Returns false when absent.
    fn set_role(&self, id: &str, role: Role) -> AppResult<bool>;
}
