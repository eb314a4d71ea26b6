use serde::{Deserialize, Serialize};

/// Durable marker of an open timer: at most one per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerMarker {
    pub user_id: String,
    /// ms since epoch
    pub started_at: i64,
}

impl TimerMarker {
    pub fn new(user_id: impl Into<String>, started_at: i64) -> Self {
        Self {
            user_id: user_id.into(),
            started_at,
        }
    }
}
