pub mod active;
pub mod admin;
pub mod ledger;
pub mod log;
pub mod payroll;
pub mod permissions;
pub mod refresh;
pub mod timer;
pub mod tracker;
pub mod users;
