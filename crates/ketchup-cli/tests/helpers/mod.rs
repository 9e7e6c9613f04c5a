#![allow(dead_code)]

use assert_cmd::Command;
use chrono::{Duration, NaiveDate, Utc};
use std::path::PathBuf;
use tempfile::TempDir;

pub const DEFAULT_USER: &str = "alice@example.com:Alice";

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// A command with no user configured
    pub fn bare_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("ketchup").expect("Failed to find ketchup binary");

        // Run inside the temp dir so no stray ketchup.toml is picked up
        cmd.current_dir(self.temp_dir.path())
            .env_remove("KETCHUP_CONFIG")
            .env_remove("KETCHUP_DEFAULT_USER")
            .env_remove("KETCHUP_DEFAULT_SORT")
            .env_remove("RUST_LOG")
            .env("KETCHUP_DATABASE_PATH", &self.db_path)
            .env("KETCHUP_TIMEZONE", "UTC");

        cmd
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = self.bare_command();
        cmd.env("KETCHUP_DEFAULT_USER", DEFAULT_USER);
        cmd
    }

    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Stdout of a successful command
    pub fn stdout(&self, args: &[&str]) -> String {
        let output = self.run_success(args).get_output().stdout.clone();
        String::from_utf8(output).expect("stdout is UTF-8")
    }
}

/// Today in UTC, matching `KETCHUP_TIMEZONE` above.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_from_today(days: i64) -> String {
    (today() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error")
    }

    pub fn empty_dashboard() -> impl Predicate<str> {
        predicate::str::contains("Nothing overdue.").and(predicate::str::contains("Nothing upcoming."))
    }
}
