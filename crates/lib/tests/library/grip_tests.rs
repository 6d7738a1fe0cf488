//! Resolution of the Grip game project fixture.

use modplan_lib::{Configuration, Environment, PchMode, Platform, TargetKind, resolve};

use super::common::{assert_partitioned, assert_topological, env, load_fixture};

fn steam_env(platform: Platform) -> Environment {
  env(platform).with_feature("GRIP_USE_STEAM", true)
}

#[test]
fn fixture_loads_cleanly() {
  let project = load_fixture("grip.json");
  assert_eq!(project.target.name(), "GripGame");
  assert_eq!(project.target.kind(), TargetKind::Executable);
  assert_eq!(project.target.root_modules(), ["Grip".to_string()]);
  assert_eq!(project.registry.len(), 23);
  assert!(project.registry.validate().is_empty());
}

#[test]
fn desktop_with_steam_links_steamworks_and_loads_subsystem() {
  let project = load_fixture("grip.json");
  let plan = resolve(&project.target, &project.registry, &steam_env(Platform::Win64)).unwrap();

  assert_eq!(plan.len(), 23);
  assert!(plan.is_linked("Steamworks"));
  assert_eq!(plan.dynamic_set, vec!["OnlineSubsystemSteam"]);
  assert_eq!(plan.ordered_modules.last().map(String::as_str), Some("Grip"));
  assert_eq!(plan.ordered_modules.first().map(String::as_str), Some("Core"));
  assert_topological(&plan);
  assert_partitioned(&plan);
}

#[test]
fn steam_requires_the_feature_flag() {
  let project = load_fixture("grip.json");
  let plan = resolve(&project.target, &project.registry, &env(Platform::Linux)).unwrap();

  assert_eq!(plan.len(), 21);
  assert!(!plan.contains("Steamworks"));
  assert!(!plan.contains("OnlineSubsystemSteam"));
  assert!(plan.dynamic_set.is_empty());
}

#[test]
fn mobile_platforms_never_pull_in_steam() {
  let project = load_fixture("grip.json");

  let android = resolve(&project.target, &project.registry, &steam_env(Platform::Android)).unwrap();
  assert_eq!(android.len(), 21);
  assert!(!android.contains("Steamworks"));

  // PhysX is unavailable on iOS, so Grip's edge to it is dropped as well.
  let ios = resolve(&project.target, &project.registry, &steam_env(Platform::IOS)).unwrap();
  assert_eq!(ios.len(), 20);
  assert!(!ios.contains("PhysX"));
  assert!(!ios.link_dependencies["Grip"].contains(&"PhysX".to_string()));
  assert_topological(&ios);
}

#[test]
fn every_known_platform_resolves_topologically() {
  let project = load_fixture("grip.json");
  for platform in Platform::known() {
    for configuration in Configuration::all() {
      let environment = Environment::for_platform(platform.clone(), configuration).with_feature("GRIP_USE_STEAM", true);
      let plan = resolve(&project.target, &project.registry, &environment).unwrap();
      assert_topological(&plan);
      assert_partitioned(&plan);
    }
  }
}

#[test]
fn grip_definitions_collect_public_exports() {
  let project = load_fixture("grip.json");
  let plan = resolve(&project.target, &project.registry, &steam_env(Platform::Win64)).unwrap();

  assert_eq!(
    plan.definitions["Grip"],
    vec![
      "BUILD_DEVELOPMENT=1",
      "IS_PROGRAM=1",
      "PLATFORM_WIN64=1",
      "STRICT_INCLUDES=1",
      "GRIP_BUILD=1",
      "WITH_CORE=1",
      "WITH_ENGINE=1",
      "WITH_STEAMWORKS=1",
    ]
  );
  assert_eq!(
    plan.definitions["Engine"],
    vec![
      "BUILD_DEVELOPMENT=1",
      "IS_PROGRAM=1",
      "PLATFORM_WIN64=1",
      "STRICT_INCLUDES=1",
      "WITH_ENGINE=1",
      "WITH_CORE=1",
    ]
  );
  assert!(plan.definitions["PhysX"].contains(&"PHYSX_INTERNAL=1".to_string()));
  assert!(!plan.definitions["Grip"].contains(&"PHYSX_INTERNAL=1".to_string()));
}

#[test]
fn grip_uses_shared_pch() {
  let project = load_fixture("grip.json");
  let plan = resolve(&project.target, &project.registry, &steam_env(Platform::Mac)).unwrap();
  assert_eq!(plan.pch_modes["Grip"], PchMode::UseSharedOrExplicit);
  assert_eq!(plan.pch_modes["Core"], PchMode::None);
  assert_eq!(plan.pch_modes.len(), plan.len());
}
