#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use tempfile::TempDir;

/// Isolated workspace: a private config dir and database per test.
pub struct TestEnv {
    pub dir: TempDir,
    pub db: String,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir
            .path()
            .join("timedesk.sqlite")
            .to_string_lossy()
            .to_string();
        Self { dir, db }
    }

    /// Binary pointed at this env's database and config directory.
    pub fn td(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("timedesk");
        cmd.env("TIMEDESK_HOME", self.dir.path())
            .env_remove("RUST_LOG")
            .args(["--db", &self.db]);
        cmd
    }

    /// Same, acting as `user`.
    pub fn as_user(&self, user: &str) -> Command {
        let mut cmd = self.td();
        cmd.args(["--as", user]);
        cmd
    }

    pub fn out_path(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().to_string()
    }
}

/// Initialised database with admin `a1` and member `u1`.
pub fn init_with_roster() -> TestEnv {
    let env = TestEnv::new();
    env.td()
        .args(["--test", "init", "--admin", "a1", "--name", "Ada Admin"])
        .assert()
        .success();
    env.as_user("a1")
        .args(["user", "add", "u1", "Alice Field"])
        .assert()
        .success();
    env
}
