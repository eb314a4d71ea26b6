//! Background loops: the presence poller and the once-per-second display tick.
//!
//! A loop runs on its own named thread, ticks immediately and then once per
//! interval, and stops when its handle is cancelled or dropped. Cancelling
//! wakes the thread right away instead of waiting out the interval.

use crate::core::active::ActiveUsersSnapshot;
use crate::errors::{AppError, AppResult};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

pub struct RefreshHandle {
    name: String,
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop and wait for the in-flight tick to finish.
    pub fn cancel(&mut self) {
        // Dropping the sender disconnects the channel and wakes the thread.
        self.stop.take();
        if let Some(t) = self.thread.take()
            && t.join().is_err()
        {
            warn!(loop_name = %self.name, "refresh loop panicked");
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `tick` now and then every `interval` until the handle goes away.
/// A failing tick is logged and the loop keeps going.
pub fn spawn_refresh<F>(name: &str, interval: Duration, mut tick: F) -> AppResult<RefreshHandle>
where
    F: FnMut() -> AppResult<()> + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<()>();
    let loop_name = name.to_string();

    let thread = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            loop {
                if let Err(e) = tick() {
                    warn!(loop_name = %loop_name, error = %e, "refresh tick failed");
                }
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!(loop_name = %loop_name, "refresh loop stopped");
        })?;

    Ok(RefreshHandle {
        name: name.to_string(),
        stop: Some(tx),
        thread: Some(thread),
    })
}

type Slot = Arc<RwLock<Option<ActiveUsersSnapshot>>>;

/// Polls the shared timer store and keeps the latest active-users snapshot.
///
/// Readers get the last good snapshot; a failed poll leaves it untouched.
pub struct PresencePoller {
    latest: Slot,
    handle: RefreshHandle,
}

/// Cloneable read side of a [`PresencePoller`], for other threads.
#[derive(Clone)]
pub struct SnapshotReader {
    latest: Slot,
}

impl SnapshotReader {
    pub fn latest(&self) -> Option<ActiveUsersSnapshot> {
        self.latest.read().ok().and_then(|g| g.clone())
    }
}

impl PresencePoller {
    pub fn spawn<F>(interval: Duration, mut fetch: F) -> AppResult<Self>
    where
        F: FnMut() -> AppResult<ActiveUsersSnapshot> + Send + 'static,
    {
        let latest = Arc::new(RwLock::new(None));
        let slot = Arc::clone(&latest);

        let handle = spawn_refresh("presence-poller", interval, move || {
            let snapshot = fetch()?;
            let mut guard = slot
                .write()
                .map_err(|e| AppError::Poisoned(e.to_string()))?;
            *guard = Some(snapshot);
            Ok(())
        })?;

        Ok(Self { latest, handle })
    }

    pub fn latest(&self) -> Option<ActiveUsersSnapshot> {
        self.reader().latest()
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            latest: Arc::clone(&self.latest),
        }
    }

    pub fn stop(mut self) {
        self.handle.cancel();
    }
}
