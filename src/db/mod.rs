pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod stats;
pub mod timers;
pub mod users;

/// Format version written into every `timers` and `time_logs` row.
pub const RECORD_VERSION: i64 = 1;
