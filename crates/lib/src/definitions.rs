//! Compile definition propagation.
//!
//! Every module in a plan gets a list of compile definitions (`NAME` or
//! `NAME=VALUE`). They come from three places:
//!
//! 1. Target defaults: configuration, target kind, platform and the build
//!    settings version.
//! 2. The module's own private and public definitions.
//! 3. Definitions exported by its link dependencies. A module exports its
//!    public definitions plus whatever its public dependencies export, so
//!    public edges are transitive and private edges stop after one hop.
//!
//! Dynamic dependencies are not linked and contribute nothing.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::environment::Environment;
use crate::module::DependencyKind;
use crate::registry::ModuleRegistry;
use crate::target::{TargetDescriptor, TargetKind};

/// Definitions applied to every module of `target` when built for `env`.
pub fn default_definitions(target: &TargetDescriptor, env: &Environment) -> Vec<String> {
  let mut defs = vec![format!("BUILD_{}=1", env.configuration.as_str().to_ascii_uppercase())];

  defs.push(
    match target.kind() {
      TargetKind::Executable => "IS_PROGRAM=1",
      TargetKind::SharedLibrary => "IS_SHARED_LIBRARY=1",
      TargetKind::StaticLibrary => "IS_STATIC_LIBRARY=1",
      TargetKind::TestHarness => "IS_TEST_HARNESS=1",
    }
    .to_string(),
  );

  if env.platform.is_known() {
    defs.push(format!("PLATFORM_{}=1", env.platform.as_str().to_ascii_uppercase()));
  }

  defs.extend(
    target
      .build_settings_version()
      .default_definitions()
      .iter()
      .map(|d| d.to_string()),
  );
  defs
}

/// Appends items to a list, skipping ones already present.
struct UniqueList {
  items: Vec<String>,
  seen: HashSet<String>,
}

impl UniqueList {
  fn new() -> Self {
    Self {
      items: Vec::new(),
      seen: HashSet::new(),
    }
  }

  fn extend<'a>(&mut self, defs: impl IntoIterator<Item = &'a String>) {
    for def in defs {
      if self.seen.insert(def.clone()) {
        self.items.push(def.clone());
      }
    }
  }
}

/// Compute effective definitions for every module in `ordered`.
///
/// `ordered` must list dependencies before dependents, and `link_edges` holds
/// each module's active link edges in declaration order.
pub(crate) fn compute(
  registry: &ModuleRegistry,
  ordered: &[String],
  link_edges: &HashMap<&str, Vec<(&str, DependencyKind)>>,
  defaults: &[String],
) -> BTreeMap<String, Vec<String>> {
  let mut exported: HashMap<&str, Vec<String>> = HashMap::new();
  let mut effective = BTreeMap::new();

  for name in ordered {
    let Some(module) = registry.get(name) else {
      continue;
    };
    let edges = link_edges.get(name.as_str()).map(Vec::as_slice).unwrap_or(&[]);

    let mut exports = UniqueList::new();
    exports.extend(&module.public_definitions);
    for (dep, kind) in edges {
      if *kind == DependencyKind::Public
        && let Some(dep_exports) = exported.get(dep)
      {
        exports.extend(dep_exports);
      }
    }

    let mut defs = UniqueList::new();
    defs.extend(defaults);
    defs.extend(&module.private_definitions);
    defs.extend(&module.public_definitions);
    for (dep, _) in edges {
      if let Some(dep_exports) = exported.get(dep) {
        defs.extend(dep_exports);
      }
    }

    exported.insert(name.as_str(), exports.items);
    effective.insert(name.clone(), defs.items);
  }

  effective
}
