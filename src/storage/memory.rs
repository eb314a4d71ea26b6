//! In-memory storage.
//!
//! Clones share the same state, so two clones behave like two sessions
//! pointed at the same durable store.

use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::time_log::{NewTimeLog, TimeLogEntry, sort_desc};
use crate::models::timer::TimerMarker;
use crate::models::user::User;
use crate::storage::traits::{LedgerStore, TimerMarkerStore, UserDirectory};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    markers: BTreeMap<String, i64>,
    entries: Vec<TimeLogEntry>,
    next_id: i64,
    users: Vec<User>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let store = Self::default();
        if let Ok(mut s) = store.state.lock() {
            s.users = users;
        }
        store
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| AppError::Poisoned(e.to_string()))
    }
}

impl TimerMarkerStore for MemoryStore {
    fn get_marker(&self, user_id: &str) -> AppResult<Option<TimerMarker>> {
        let s = self.lock()?;
        Ok(s
            .markers
            .get(user_id)
            .map(|&started_at| TimerMarker::new(user_id, started_at)))
    }

    fn put_marker_if_absent(&self, marker: &TimerMarker) -> AppResult<bool> {
        let mut s = self.lock()?;
        if s.markers.contains_key(&marker.user_id) {
            return Ok(false);
        }
        s.markers.insert(marker.user_id.clone(), marker.started_at);
        Ok(true)
    }

    fn take_marker(&self, user_id: &str) -> AppResult<Option<TimerMarker>> {
        let mut s = self.lock()?;
        Ok(s
            .markers
            .remove(user_id)
            .map(|started_at| TimerMarker::new(user_id, started_at)))
    }

    fn list_markers(&self) -> AppResult<Vec<TimerMarker>> {
        let s = self.lock()?;
        Ok(s
            .markers
            .iter()
            .map(|(u, &started_at)| TimerMarker::new(u.clone(), started_at))
            .collect())
    }
}

impl LedgerStore for MemoryStore {
    fn insert_entry(&self, draft: &NewTimeLog) -> AppResult<TimeLogEntry> {
        let mut s = self.lock()?;
        s.next_id += 1;
        let entry = draft.clone().into_entry(s.next_id);
        s.entries.insert(0, entry.clone());
        Ok(entry)
    }

    fn get_entry(&self, id: i64) -> AppResult<Option<TimeLogEntry>> {
        let s = self.lock()?;
        Ok(s.entries.iter().find(|e| e.id == id).cloned())
    }

    fn replace_entry(&self, entry: &TimeLogEntry) -> AppResult<bool> {
        let mut s = self.lock()?;
        match s.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                slot.start_time = entry.start_time;
                slot.end_time = entry.end_time;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_entry(&self, id: i64) -> AppResult<bool> {
        let mut s = self.lock()?;
        let before = s.entries.len();
        s.entries.retain(|e| e.id != id);
        Ok(s.entries.len() != before)
    }

    fn list_entries(&self, user_id: Option<&str>) -> AppResult<Vec<TimeLogEntry>> {
        let s = self.lock()?;
        let mut out: Vec<TimeLogEntry> = s
            .entries
            .iter()
            .filter(|e| user_id.is_none_or(|u| e.user_id == u))
            .cloned()
            .collect();
        sort_desc(&mut out);
        Ok(out)
    }
}

impl UserDirectory for MemoryStore {
    fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.lock()?.users.clone())
    }

    fn add_user(&self, user: &User) -> AppResult<bool> {
        let mut s = self.lock()?;
        if s.users.iter().any(|u| u.id == user.id) {
            return Ok(false);
        }
        s.users.push(user.clone());
        Ok(true)
    }

    fn remove_user(&self, id: &str) -> AppResult<bool> {
        let mut s = self.lock()?;
        let before = s.users.len();
        s.users.retain(|u| u.id != id);
        Ok(s.users.len() != before)
    }

    fn set_role(&self, id: &str, role: Role) -> AppResult<bool> {
        let mut s = self.lock()?;
        match s.users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_markers() {
        let a = MemoryStore::new();
        let b = a.clone();
        assert!(a.put_marker_if_absent(&TimerMarker::new("u1", 5)).unwrap());
        assert!(!b.put_marker_if_absent(&TimerMarker::new("u1", 9)).unwrap());
        assert_eq!(b.get_marker("u1").unwrap().unwrap().started_at, 5);
        assert_eq!(b.take_marker("u1").unwrap().unwrap().started_at, 5);
        assert!(a.take_marker("u1").unwrap().is_none());
    }

    #[test]
    fn ids_are_unique_and_listing_is_newest_first() {
        let s = MemoryStore::new();
        let a = s.insert_entry(&NewTimeLog::closed("u1", 10, 20)).unwrap();
        let b = s.insert_entry(&NewTimeLog::closed("u1", 30, 40)).unwrap();
        let c = s.insert_entry(&NewTimeLog::closed("u2", 5, 6)).unwrap();
        assert_ne!(a.id, b.id);
        let all = s.list_entries(None).unwrap();
        assert_eq!(
            all.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![b.id, a.id, c.id]
        );
        assert_eq!(s.list_entries(Some("u2")).unwrap(), vec![c]);
    }

    #[test]
    fn delete_reports_presence() {
        let s = MemoryStore::new();
        let a = s.insert_entry(&NewTimeLog::closed("u1", 10, 20)).unwrap();
        assert!(s.delete_entry(a.id).unwrap());
        assert!(!s.delete_entry(a.id).unwrap());
    }
}
