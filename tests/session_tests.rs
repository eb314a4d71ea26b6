//! Two sessions on one database file: what one starts or stops, the other
//! observes within a poll interval.

use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use timedesk::clock::{Clock, ManualClock, SystemClock};
use timedesk::core::active::ActiveUsersView;
use timedesk::core::payroll::PayrollReportEngine;
use timedesk::core::refresh::PresencePoller;
use timedesk::core::tracker::TimeTracker;
use timedesk::db::pool::DbPool;
use timedesk::errors::AppError;
use timedesk::models::user::User;
use timedesk::storage::traits::{LedgerStore, UserDirectory};

fn db() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite").to_string_lossy().to_string();
    let pool = DbPool::open(&path).unwrap();
    pool.add_user(&User::admin("a1", "Ada Admin")).unwrap();
    pool.add_user(&User::member("u1", "Alice Field")).unwrap();
    (dir, path)
}

#[test]
fn second_session_sees_start_and_stop() {
    let (_dir, path) = db();
    let field = DbPool::open(&path).unwrap();
    let office = DbPool::open(&path).unwrap();
    let clock = ManualClock::at("2025-02-12T09:00:00-07:00");

    TimeTracker::new(&field, clock.clone()).start("u1").unwrap();
    clock.advance_secs(90);

    let snap = ActiveUsersView::new(&office, clock.clone()).snapshot().unwrap();
    assert_eq!(snap.count(), 1);
    assert_eq!(snap.rows[0].name, "Alice Field");
    assert_eq!(snap.rows[0].elapsed, "00:01:30");

    TimeTracker::new(&field, clock.clone()).stop("u1").unwrap();
    let snap = ActiveUsersView::new(&office, clock.clone()).snapshot().unwrap();
    assert!(snap.is_empty());
    assert_eq!(office.list_entries(Some("u1")).unwrap().len(), 1);
}

#[test]
fn user_stop_and_admin_force_stop_race_records_once() {
    let (_dir, path) = db();
    let clock = ManualClock::at("2025-02-12T09:00:00-07:00");
    TimeTracker::new(&DbPool::open(&path).unwrap(), clock.clone())
        .start("u1")
        .unwrap();
    clock.advance_secs(3600);

    let admin = User::admin("a1", "Ada Admin");
    let handles: Vec<_> = (0..2)
        .map(|i| {
            let path = path.clone();
            let clock = clock.clone();
            let admin = admin.clone();
            thread::spawn(move || {
                let pool = DbPool::open(&path).unwrap();
                let tracker = TimeTracker::new(&pool, clock);
                if i == 0 {
                    tracker.stop("u1").unwrap()
                } else {
                    tracker.force_stop("u1", &admin).unwrap()
                }
            })
        })
        .collect();

    let recorded: usize = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(Option::is_some)
        .count();

    assert_eq!(recorded, 1);
    let pool = DbPool::open(&path).unwrap();
    assert_eq!(pool.list_entries(Some("u1")).unwrap().len(), 1);
}

#[test]
fn member_force_stop_changes_nothing() {
    let (_dir, path) = db();
    let pool = DbPool::open(&path).unwrap();
    let clock = ManualClock::new(1_000);
    let tracker = TimeTracker::new(&pool, clock);
    tracker.start("a1").unwrap();

    let err = tracker
        .force_stop("a1", &User::member("u1", "Alice Field"))
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));
    assert!(tracker.timers().is_running("a1").unwrap());
    assert!(pool.list_entries(None).unwrap().is_empty());
}

#[test]
fn poller_picks_up_a_timer_within_one_interval() {
    let (_dir, path) = db();
    let poll_pool = DbPool::open(&path).unwrap();
    let interval = Duration::from_millis(200);
    let poller = PresencePoller::spawn(interval, move || {
        ActiveUsersView::new(&poll_pool, SystemClock).snapshot()
    })
    .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while poller.latest().is_none() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    assert!(poller.latest().is_some_and(|s| s.is_empty()));

    let writer = DbPool::open(&path).unwrap();
    TimeTracker::new(&writer, SystemClock).start("u1").unwrap();
    let started = Instant::now();

    let mut seen = false;
    while started.elapsed() < interval * 5 {
        if poller.latest().is_some_and(|s| s.count() == 1) {
            seen = true;
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    poller.stop();
    assert!(seen, "poller did not observe the new timer");
}

#[test]
fn payroll_counts_an_open_timer_up_to_now() {
    let (_dir, path) = db();
    let pool = DbPool::open(&path).unwrap();
    let clock = ManualClock::at("2025-02-12T09:00:00-07:00");
    TimeTracker::new(&pool, clock.clone()).start("u1").unwrap();
    clock.advance_secs(3 * 3600);

    let engine = PayrollReportEngine::new(&pool, clock.clone());
    let hours = engine
        .compute_billable_hours(Some("u1"), Some("2025-02-12"), Some("2025-02-12"))
        .unwrap();
    assert!((hours - 3.0).abs() < 1e-9);

    clock.advance_secs(60);
    let later = engine
        .compute_billable_hours(Some("u1"), Some("2025-02-12"), Some("2025-02-12"))
        .unwrap();
    assert!(later > hours);
    assert!(clock.now_ms() > 0);
}
