pub mod role;
pub mod time_log;
pub mod timer;
pub mod user;
