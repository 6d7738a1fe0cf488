//! Resolve command integration tests.

use predicates::prelude::*;
use serde_json::json;

use super::common::TestEnv;

#[test]
fn resolve_win64_plan() {
  let env = TestEnv::from_fixture("steam.json");
  let plan = env.resolve_json(&["--platform", "Win64", "--configuration", "Shipping"]);

  assert_eq!(plan["orderedModules"], json!(["Core", "Net", "SteamIntegration", "App"]));
  assert_eq!(plan["linkSet"], json!(["Core", "Net", "App"]));
  assert_eq!(plan["dynamicSet"], json!(["SteamIntegration"]));
  assert_eq!(plan["environment"]["platform"], "Win64");
  assert_eq!(plan["environment"]["configuration"], "Shipping");
}

#[test]
fn resolve_android_plan() {
  let env = TestEnv::from_fixture("steam.json");
  let plan = env.resolve_json(&["--platform", "Android"]);

  assert_eq!(plan["orderedModules"], json!(["Core", "Net", "App"]));
  assert_eq!(plan["dynamicSet"], json!([]));
}

#[test]
fn resolve_is_deterministic() {
  let env = TestEnv::from_fixture("grip.json");
  let args = ["--platform", "Win64", "--feature", "GRIP_USE_STEAM"];
  assert_eq!(env.resolve_json(&args), env.resolve_json(&args));
}

#[test]
fn feature_flag_enables_steam() {
  let env = TestEnv::from_fixture("grip.json");

  let without = env.resolve_json(&["--platform", "Linux"]);
  assert_eq!(without["dynamicSet"], json!([]));

  let with = env.resolve_json(&["--platform", "Linux", "--feature", "GRIP_USE_STEAM=true"]);
  assert_eq!(with["dynamicSet"], json!(["OnlineSubsystemSteam"]));

  let disabled = env.resolve_json(&["--platform", "Linux", "--feature", "GRIP_USE_STEAM=false"]);
  assert_eq!(disabled, without);
}

#[test]
fn resolve_text_output_lists_build_order() {
  let env = TestEnv::from_fixture("steam.json");
  env
    .modplan_cmd()
    .arg("resolve")
    .arg(&env.project_path)
    .args(["--platform", "Mac"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Build order:"))
    .stdout(predicate::str::contains("SteamIntegration (dynamic)"))
    .stdout(predicate::str::contains("App (link)"));
}

#[test]
fn resolve_writes_plan_file() {
  let env = TestEnv::from_fixture("steam.json");
  let out = env.output_path("plans/win64.json");

  env
    .modplan_cmd()
    .arg("resolve")
    .arg(&env.project_path)
    .args(["--platform", "Win64", "--output"])
    .arg(&out)
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote plan to"));

  let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
  assert_eq!(written["orderedModules"], json!(["Core", "Net", "SteamIntegration", "App"]));
  assert!(written["precompiledHeaderModes"].is_object());
}

#[test]
fn cycle_reports_full_path() {
  let env = TestEnv::from_fixture("cycle.json");
  env
    .modplan_cmd()
    .arg("resolve")
    .arg(&env.project_path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("CyclicDependency"))
    .stderr(predicate::str::contains("App -> Net -> App"));
}

#[test]
fn unknown_dependency_names_parent() {
  let env = TestEnv::from_fixture("unknown_dependency.json");

  env
    .modplan_cmd()
    .arg("resolve")
    .arg(&env.project_path)
    .args(["--platform", "Linux"])
    .assert()
    .success();

  env
    .modplan_cmd()
    .arg("resolve")
    .arg(&env.project_path)
    .args(["--platform", "Win64"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("UnknownModule"))
    .stderr(predicate::str::contains("'D3D12' (referenced by 'Game')"));
}

#[test]
fn max_depth_flag_limits_traversal() {
  let env = TestEnv::from_fixture("steam.json");
  env
    .modplan_cmd()
    .arg("resolve")
    .arg(&env.project_path)
    .args(["--platform", "Win64", "--max-depth", "2"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("DepthExceeded"));
}

#[test]
fn max_depth_env_var_is_honoured() {
  let env = TestEnv::from_fixture("steam.json");
  env
    .modplan_cmd()
    .env("MODPLAN_MAX_DEPTH", "2")
    .arg("resolve")
    .arg(&env.project_path)
    .args(["--platform", "Linux"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("depth limit of 2"));
}

#[test]
fn invalid_configuration_is_rejected() {
  let env = TestEnv::from_fixture("steam.json");
  env
    .modplan_cmd()
    .arg("resolve")
    .arg(&env.project_path)
    .args(["--configuration", "Release"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid --configuration"));
}
