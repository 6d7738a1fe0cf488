//! Matrix command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn matrix_covers_every_known_platform() {
  let env = TestEnv::from_fixture("steam.json");
  env
    .modplan_cmd()
    .arg("matrix")
    .arg(&env.project_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Win32-x86-Development: 3 modules"))
    .stdout(predicate::str::contains("Win64-x86_64-Development: 4 modules (3 linked, 1 dynamic)"))
    .stdout(predicate::str::contains("Android-arm64-Development: 3 modules"));
}

#[test]
fn matrix_json_has_one_entry_per_platform() {
  let env = TestEnv::from_fixture("grip.json");
  let output = env
    .modplan_cmd()
    .arg("matrix")
    .arg(&env.project_path)
    .args(["--configuration", "Shipping", "--feature", "GRIP_USE_STEAM", "--json"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let entries = entries.as_array().unwrap();
  assert_eq!(entries.len(), 6);
  for entry in entries {
    assert_eq!(entry["environment"]["configuration"], "Shipping");
    assert!(entry["fingerprint"].is_string());
  }
  assert_eq!(entries[1]["plan"]["dynamicSet"][0], "OnlineSubsystemSteam");
  assert_eq!(entries[5]["plan"]["dynamicSet"].as_array().unwrap().len(), 0);
}

#[test]
fn matrix_fails_when_any_environment_fails() {
  let env = TestEnv::from_fixture("unknown_dependency.json");
  env
    .modplan_cmd()
    .arg("matrix")
    .arg(&env.project_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("1 of 6 environments failed to resolve"));
}
