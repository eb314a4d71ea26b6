//! "Who is currently active": open timers joined with the roster.

use crate::clock::Clock;
use crate::core::timer::TimerStore;
use crate::errors::AppResult;
use crate::models::user::{UNKNOWN_USER_NAME, User};
use crate::storage::traits::{TimerMarkerStore, UserDirectory};
use crate::utils::formatting::hms;
use serde::Serialize;
use std::collections::BTreeMap;

pub const EMPTY_STATE: &str = "No active timers running.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveUserRow {
    pub user_id: String,
    pub name: String,
    pub started_at: i64,
    pub elapsed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveUsersSnapshot {
    pub rows: Vec<ActiveUserRow>,
}

impl ActiveUsersSnapshot {
    /// Rows follow roster order; timers of users missing from the roster come
    /// last, by id, so the list and the count badge always agree.
    pub fn build(open: &BTreeMap<String, i64>, roster: &[User], now_ms: i64) -> Self {
        let mut rows: Vec<ActiveUserRow> = roster
            .iter()
            .filter_map(|u| {
                open.get(&u.id).map(|&started_at| ActiveUserRow {
                    user_id: u.id.clone(),
                    name: u.name.clone(),
                    started_at,
                    elapsed: hms(now_ms - started_at),
                })
            })
            .collect();

        for (user_id, &started_at) in open {
            if !roster.iter().any(|u| &u.id == user_id) {
                rows.push(ActiveUserRow {
                    user_id: user_id.clone(),
                    name: UNKNOWN_USER_NAME.to_string(),
                    started_at,
                    elapsed: hms(now_ms - started_at),
                });
            }
        }

        Self { rows }
    }

    /// Count badge.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Recompute elapsed strings for a new instant.
    pub fn refresh(&mut self, now_ms: i64) {
        for r in &mut self.rows {
            r.elapsed = hms(now_ms - r.started_at);
        }
    }

    /// One line per active user, or the empty-state message.
    pub fn lines(&self) -> Vec<String> {
        if self.is_empty() {
            return vec![EMPTY_STATE.to_string()];
        }
        self.rows
            .iter()
            .map(|r| format!("{:<24} {:<12} {}", r.name, r.user_id, r.elapsed))
            .collect()
    }
}

pub struct ActiveUsersView<'a, S: TimerMarkerStore + UserDirectory + ?Sized, C: Clock> {
    store: &'a S,
    timers: TimerStore<'a, S, C>,
}

impl<'a, S: TimerMarkerStore + UserDirectory + ?Sized, C: Clock> ActiveUsersView<'a, S, C> {
    pub fn new(store: &'a S, clock: C) -> Self {
        Self {
            store,
            timers: TimerStore::new(store, clock),
        }
    }

    pub fn snapshot(&self) -> AppResult<ActiveUsersSnapshot> {
        let open = self.timers.list_open()?;
        let roster = self.store.list_users()?;
        Ok(ActiveUsersSnapshot::build(
            &open,
            &roster,
            self.timers.now_ms(),
        ))
    }
}
