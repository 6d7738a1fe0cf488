//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding a copy of the project
/// and any plan files the command writes.
pub struct TestEnv {
  pub temp: TempDir,
  pub project_path: PathBuf,
}

impl TestEnv {
  /// Create from a fixture file, copied to `project.json` in a temp directory.
  pub fn from_fixture(name: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let project_path = temp.path().join("project.json");
    std::fs::write(&project_path, fixture_content(name)).unwrap();
    Self { temp, project_path }
  }

  /// Path for command output inside the temp directory.
  pub fn output_path(&self, name: &str) -> PathBuf {
    self.temp.path().join(name)
  }

  /// Command with `MODPLAN_MAX_DEPTH` and `RUST_LOG` cleared.
  pub fn modplan_cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("modplan");
    cmd.env_remove("MODPLAN_MAX_DEPTH").env_remove("RUST_LOG");
    cmd
  }

  /// Run `resolve --json` with extra args and parse the plan.
  pub fn resolve_json(&self, args: &[&str]) -> serde_json::Value {
    let output = self
      .modplan_cmd()
      .arg("resolve")
      .arg(&self.project_path)
      .args(args)
      .arg("--json")
      .output()
      .unwrap();
    assert!(
      output.status.success(),
      "resolve failed: {}",
      String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
  }
}
