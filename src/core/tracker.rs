//! Session-level orchestration of timers and the ledger.
//!
//! A stop closes the marker and appends exactly one ledger entry. A stop that
//! loses a race against another session (user vs. admin) finds no marker and
//! becomes a no-op instead of an error.

use crate::clock::Clock;
use crate::core::ledger::TimeLogLedger;
use crate::core::permissions::require_admin;
use crate::core::timer::TimerStore;
use crate::errors::{AppError, AppResult};
use crate::models::time_log::{NewTimeLog, TimeLogEntry};
use crate::models::timer::TimerMarker;
use crate::models::user::User;
use crate::storage::traits::{LedgerStore, TimerMarkerStore};
use tracing::{debug, error};

/// Outcome of a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Started(TimerMarker),
    /// `None` when another session closed the timer first.
    Stopped(Option<TimeLogEntry>),
}

pub struct TimeTracker<'a, S, C>
where
    S: TimerMarkerStore + LedgerStore + ?Sized,
    C: Clock,
{
    timers: TimerStore<'a, S, C>,
    ledger: TimeLogLedger<'a, S>,
}

impl<'a, S, C> TimeTracker<'a, S, C>
where
    S: TimerMarkerStore + LedgerStore + ?Sized,
    C: Clock,
{
    pub fn new(store: &'a S, clock: C) -> Self {
        Self {
            timers: TimerStore::new(store, clock),
            ledger: TimeLogLedger::new(store),
        }
    }

    pub fn timers(&self) -> &TimerStore<'a, S, C> {
        &self.timers
    }

    pub fn start(&self, user_id: &str) -> AppResult<TimerMarker> {
        self.timers.start(user_id)
    }

    /// Stop the user's own timer. `Ok(None)` when nothing was running.
    pub fn stop(&self, user_id: &str) -> AppResult<Option<TimeLogEntry>> {
        let closed = self.timers.stop(user_id);
        self.record(user_id, closed)
    }

    /// Admin override from the active-users panel.
    pub fn force_stop(&self, user_id: &str, acting: &User) -> AppResult<Option<TimeLogEntry>> {
        require_admin(acting, "force stop")?;
        let closed = self.timers.force_stop(user_id, acting);
        self.record(user_id, closed)
    }

    /// Start when nothing is open, stop otherwise. The decision is read from
    /// the marker store, not from any cached state.
    pub fn toggle(&self, user_id: &str) -> AppResult<Toggle> {
        if self.timers.is_running(user_id)? {
            return Ok(Toggle::Stopped(self.stop(user_id)?));
        }

        match self.timers.start(user_id) {
            Ok(marker) => Ok(Toggle::Started(marker)),
            // another session started it in between: adopt that timer, or
            // report it closed when that session already stopped it again
            Err(AppError::AlreadyRunning(_)) => match self.timers.running_since(user_id)? {
                Some(started_at) => Ok(Toggle::Started(TimerMarker::new(user_id, started_at))),
                None => Ok(Toggle::Stopped(None)),
            },
            Err(e) => Err(e),
        }
    }

    fn record(
        &self,
        user_id: &str,
        closed: AppResult<NewTimeLog>,
    ) -> AppResult<Option<TimeLogEntry>> {
        let draft = match closed {
            Ok(d) => d,
            Err(e) if e.is_benign() => {
                debug!(user = user_id, "stop ignored: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match self.ledger.append(&draft) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                // no partial write: reopen the timer that was just closed
                let marker = TimerMarker::new(draft.user_id.clone(), draft.start_time);
                if let Err(restore_err) = self.timers.restore(&marker) {
                    error!(
                        user = user_id,
                        "failed to restore timer after ledger error: {}", restore_err
                    );
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::time_log::LogFilter;
    use crate::storage::memory::MemoryStore;

    fn entries(store: &MemoryStore, user: &str) -> Vec<TimeLogEntry> {
        TimeLogLedger::new(store)
            .query(&LogFilter::for_user(user))
            .unwrap()
    }

    #[test]
    fn stop_appends_exactly_one_entry() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(1_000);
        let t = TimeTracker::new(&store, clock.clone());

        t.start("u1").unwrap();
        clock.advance_secs(60);
        let e = t.stop("u1").unwrap().unwrap();
        assert_eq!((e.start_time, e.end_time), (1_000, Some(61_000)));

        assert_eq!(t.stop("u1").unwrap(), None);
        assert_eq!(entries(&store, "u1").len(), 1);
    }

    #[test]
    fn toggle_alternates() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(0);
        let t = TimeTracker::new(&store, clock.clone());

        assert!(matches!(t.toggle("u1").unwrap(), Toggle::Started(_)));
        clock.advance_secs(5);
        assert!(matches!(t.toggle("u1").unwrap(), Toggle::Stopped(Some(_))));
        assert!(matches!(t.toggle("u1").unwrap(), Toggle::Started(_)));
    }

    /// Marker store that always reports a foreign timer on start, which is
    /// already gone by the time it is read back.
    struct VanishingMarker(MemoryStore);

    impl TimerMarkerStore for VanishingMarker {
        fn get_marker(&self, _user_id: &str) -> AppResult<Option<TimerMarker>> {
            Ok(None)
        }
        fn put_marker_if_absent(&self, _marker: &TimerMarker) -> AppResult<bool> {
            Ok(false)
        }
        fn take_marker(&self, _user_id: &str) -> AppResult<Option<TimerMarker>> {
            Ok(None)
        }
        fn list_markers(&self) -> AppResult<Vec<TimerMarker>> {
            Ok(Vec::new())
        }
    }

    impl LedgerStore for VanishingMarker {
        fn insert_entry(&self, draft: &NewTimeLog) -> AppResult<TimeLogEntry> {
            self.0.insert_entry(draft)
        }
        fn get_entry(&self, id: i64) -> AppResult<Option<TimeLogEntry>> {
            self.0.get_entry(id)
        }
        fn replace_entry(&self, entry: &TimeLogEntry) -> AppResult<bool> {
            self.0.replace_entry(entry)
        }
        fn delete_entry(&self, id: i64) -> AppResult<bool> {
            self.0.delete_entry(id)
        }
        fn list_entries(&self, user_id: Option<&str>) -> AppResult<Vec<TimeLogEntry>> {
            self.0.list_entries(user_id)
        }
    }

    #[test]
    fn toggle_reports_stopped_when_foreign_timer_vanishes() {
        let store = VanishingMarker(MemoryStore::new());
        let t = TimeTracker::new(&store, ManualClock::new(1_000));

        assert_eq!(t.toggle("u1").unwrap(), Toggle::Stopped(None));
        assert!(store.list_entries(Some("u1")).unwrap().is_empty());
    }

    #[test]
    fn user_and_admin_racing_produce_one_entry() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(0);
        let worker = TimeTracker::new(&store, clock.clone());
        let admin_session = TimeTracker::new(&store, clock.clone());
        let admin = User::admin("a1", "Boss");

        worker.start("u1").unwrap();
        clock.advance_secs(10);

        let by_admin = admin_session.force_stop("u1", &admin).unwrap();
        let by_user = worker.stop("u1").unwrap();

        assert!(by_admin.is_some());
        assert!(by_user.is_none());
        assert_eq!(entries(&store, "u1").len(), 1);
    }

    #[test]
    fn non_admin_force_stop_changes_nothing() {
        let store = MemoryStore::new();
        let t = TimeTracker::new(&store, ManualClock::new(0));
        t.start("u1").unwrap();

        let err = t
            .force_stop("u1", &User::member("u2", "Peer"))
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
        assert!(t.timers().is_running("u1").unwrap());
        assert!(entries(&store, "u1").is_empty());
    }
}
