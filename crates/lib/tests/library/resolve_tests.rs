//! Resolution behaviour on small hand-built registries.

use modplan_lib::{
  Configuration, DependencyKind, Environment, ModuleDescriptor, ModuleRegistry, Platform, Predicate, ResolutionError,
  ResolveOptions, resolve, resolve_matrix, resolve_with,
};

use super::common::{assert_partitioned, assert_topological, env, executable, steam_registry};

#[test]
fn desktop_plan_orders_dynamic_module_before_app() {
  let plan = resolve(&executable(&["App"]), &steam_registry(), &env(Platform::Win64)).unwrap();

  assert_eq!(plan.ordered_modules, vec!["Core", "Net", "SteamIntegration", "App"]);
  assert_eq!(plan.link_set, vec!["Core", "Net", "App"]);
  assert_eq!(plan.dynamic_set, vec!["SteamIntegration"]);
  assert_topological(&plan);
  assert_partitioned(&plan);
}

#[test]
fn android_plan_omits_steam() {
  let plan = resolve(&executable(&["App"]), &steam_registry(), &env(Platform::Android)).unwrap();

  assert_eq!(plan.ordered_modules, vec!["Core", "Net", "App"]);
  assert_eq!(plan.link_set, vec!["Core", "Net", "App"]);
  assert!(plan.dynamic_set.is_empty());
  assert!(!plan.definitions.contains_key("SteamIntegration"));
}

#[test]
fn unknown_platform_behaves_like_unmatched() {
  let stadia = Environment::for_platform(Platform::Other("Stadia".into()), Configuration::Shipping);
  let plan = resolve(&executable(&["App"]), &steam_registry(), &stadia).unwrap();
  assert_eq!(plan.ordered_modules, vec!["Core", "Net", "App"]);
}

#[test]
fn mutual_dependency_is_a_cycle() {
  let registry = ModuleRegistry::new([
    ModuleDescriptor::new("App").with_public(["Net"]),
    ModuleDescriptor::new("Net").with_public(["App"]),
  ])
  .unwrap();

  let err = resolve(&executable(&["App"]), &registry, &env(Platform::Win64)).unwrap_err();
  assert_eq!(
    err,
    ResolutionError::CyclicDependency {
      path: vec!["App".to_string(), "Net".to_string(), "App".to_string()],
    }
  );
  assert_eq!(err.to_string(), "cyclic dependency: App -> Net -> App");
}

#[test]
fn cycle_path_starts_at_repeated_module() {
  let registry = ModuleRegistry::new([
    ModuleDescriptor::new("App").with_private(["A"]),
    ModuleDescriptor::new("A").with_public(["B"]),
    ModuleDescriptor::new("B").with_public(["C"]),
    ModuleDescriptor::new("C").with_dynamic(["A"]),
  ])
  .unwrap();

  let err = resolve(&executable(&["App"]), &registry, &env(Platform::Linux)).unwrap_err();
  let ResolutionError::CyclicDependency { path } = err else {
    panic!("expected a cycle, got {:?}", err);
  };
  assert_eq!(path, vec!["A", "B", "C", "A"]);
}

#[test]
fn gated_cycle_only_fails_where_active() {
  let registry = ModuleRegistry::new([
    ModuleDescriptor::new("App").with_public(["Net"]),
    ModuleDescriptor::new("Net").with_conditional(
      Predicate::feature("LOOPBACK"),
      DependencyKind::Private,
      ["App"],
    ),
  ])
  .unwrap();

  assert!(resolve(&executable(&["App"]), &registry, &env(Platform::Mac)).is_ok());

  let looped = env(Platform::Mac).with_feature("LOOPBACK", true);
  let err = resolve(&executable(&["App"]), &registry, &looped).unwrap_err();
  assert!(matches!(err, ResolutionError::CyclicDependency { .. }));
}

#[test]
fn false_predicate_dependency_never_appears() {
  let registry = ModuleRegistry::new([
    ModuleDescriptor::new("Core"),
    ModuleDescriptor::new("D3D12"),
    ModuleDescriptor::new("Metal"),
    ModuleDescriptor::new("Renderer")
      .with_public(["Core"])
      .with_conditional(
        Predicate::platforms([Platform::Win64]),
        DependencyKind::Private,
        ["D3D12"],
      )
      .with_conditional(
        Predicate::platforms([Platform::Mac, Platform::IOS]),
        DependencyKind::Private,
        ["Metal"],
      ),
  ])
  .unwrap();
  let target = executable(&["Renderer"]);

  for platform in Platform::known() {
    let plan = resolve(&target, &registry, &env(platform.clone())).unwrap();
    assert_eq!(plan.contains("D3D12"), platform == Platform::Win64, "{}", platform);
    assert_eq!(
      plan.contains("Metal"),
      matches!(platform, Platform::Mac | Platform::IOS),
      "{}",
      platform
    );
    assert_topological(&plan);
  }
}

#[test]
fn link_edge_wins_over_dynamic_edge() {
  let registry = ModuleRegistry::new([
    ModuleDescriptor::new("Audio"),
    ModuleDescriptor::new("Game").with_dynamic(["Audio"]),
    ModuleDescriptor::new("App")
      .with_public(["Game"])
      .with_private(["Audio"]),
  ])
  .unwrap();

  let plan = resolve(&executable(&["App"]), &registry, &env(Platform::Linux)).unwrap();
  assert_eq!(plan.link_set, vec!["Audio", "Game", "App"]);
  assert!(plan.dynamic_set.is_empty());
  assert_partitioned(&plan);
}

#[test]
fn dynamic_only_module_need_not_precede_its_loader() {
  let registry = ModuleRegistry::new([
    ModuleDescriptor::new("App").with_dynamic(["Plugin"]),
    ModuleDescriptor::new("Plugin"),
  ])
  .unwrap();

  let plan = resolve(&executable(&["App"]), &registry, &env(Platform::Linux)).unwrap();
  assert_eq!(plan.ordered_modules, vec!["App", "Plugin"]);
  assert_eq!(plan.dynamic_set, vec!["Plugin"]);
}

#[test]
fn multiple_roots_are_all_linked() {
  let registry = ModuleRegistry::new([
    ModuleDescriptor::new("Core"),
    ModuleDescriptor::new("Tools").with_private(["Core"]),
    ModuleDescriptor::new("Game").with_public(["Core"]),
  ])
  .unwrap();

  let plan = resolve(&executable(&["Game", "Tools"]), &registry, &env(Platform::Win64)).unwrap();
  assert_eq!(plan.ordered_modules, vec!["Core", "Tools", "Game"]);
  assert_eq!(plan.link_set, plan.ordered_modules);
}

#[test]
fn empty_target_resolves_to_empty_plan() {
  let plan = resolve(&executable(&[]), &steam_registry(), &env(Platform::Linux)).unwrap();
  assert!(plan.is_empty());
  assert!(plan.link_set.is_empty());
  assert!(plan.definitions.is_empty());
}

#[test]
fn resolution_is_deterministic() {
  let registry = steam_registry();
  let target = executable(&["App"]);
  let first = resolve(&target, &registry, &env(Platform::Win64)).unwrap();
  for _ in 0..20 {
    assert_eq!(resolve(&target, &registry, &env(Platform::Win64)).unwrap(), first);
  }
}

#[test]
fn deep_chain_hits_depth_limit() {
  let names: Vec<String> = (0..10).map(|i| format!("M{}", i)).collect();
  let registry = ModuleRegistry::new(names.iter().enumerate().map(|(i, name)| {
    let module = ModuleDescriptor::new(name.clone());
    match names.get(i + 1) {
      Some(next) => module.with_public([next.clone()]),
      None => module,
    }
  }))
  .unwrap();
  let target = executable(&["M0"]);

  let plan = resolve(&target, &registry, &env(Platform::Linux)).unwrap();
  assert_eq!(plan.ordered_modules.first().map(String::as_str), Some("M9"));

  let err = resolve_with(&target, &registry, &env(Platform::Linux), &ResolveOptions { max_depth: 5 }).unwrap_err();
  assert_eq!(
    err,
    ResolutionError::DepthExceeded {
      limit: 5,
      module: "M5".to_string()
    }
  );
}

#[test]
fn matrix_matches_individual_resolutions() {
  let registry = steam_registry();
  let target = executable(&["App"]);
  let environments: Vec<Environment> = Platform::known().into_iter().map(env).collect();

  let entries = resolve_matrix(&target, &registry, &environments, &ResolveOptions::default());
  for entry in &entries {
    let expected = resolve(&target, &registry, &entry.environment).unwrap();
    assert_eq!(entry.result.as_ref().unwrap(), &expected);
  }
  let with_steam: Vec<bool> = entries
    .iter()
    .map(|e| e.result.as_ref().unwrap().contains("SteamIntegration"))
    .collect();
  assert_eq!(with_steam, vec![false, true, true, true, false, false]);
}
