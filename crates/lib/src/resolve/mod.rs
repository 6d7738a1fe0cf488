//! Dependency resolution.
//!
//! Resolution turns a [`TargetDescriptor`] plus a [`ModuleRegistry`] into a
//! [`BuildPlan`] for one [`Environment`]:
//!
//! 1. Check every root is declared.
//! 2. Walk the graph depth-first from the roots, evaluating each module's
//!    gated edges once and dropping edges to inert modules.
//! 3. Order the reachable modules so link dependencies come first, breaking
//!    ties by registry declaration order.
//! 4. Split modules into the link set and the dynamic-load set.
//! 5. Compute effective compile definitions.
//!
//! Resolution is pure: the registry is never modified and no I/O happens.

mod matrix;
mod types;

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::definitions;
use crate::environment::Environment;
use crate::module::{DependencyEdge, DependencyKind};
use crate::registry::ModuleRegistry;
use crate::target::TargetDescriptor;

pub use crate::config::ResolveOptions;
pub use matrix::{MatrixEntry, resolve_matrix};
pub use types::{BuildPlan, PlanTarget, ResolutionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
  InProgress,
  Done,
}

/// Depth-first walker over the active edges of a registry.
struct Walker<'a> {
  registry: &'a ModuleRegistry,
  env: &'a Environment,
  max_depth: usize,
  marks: HashMap<&'a str, Mark>,
  /// Modules currently being visited, outermost first.
  stack: Vec<&'a str>,
  /// Active edges of every finished module.
  edges: HashMap<&'a str, Vec<DependencyEdge<'a>>>,
}

/// A module on the walk path plus the index of its next unvisited edge.
struct Frame<'a> {
  name: &'a str,
  active: Vec<DependencyEdge<'a>>,
  next: usize,
}

impl<'a> Walker<'a> {
  fn new(registry: &'a ModuleRegistry, env: &'a Environment, max_depth: usize) -> Self {
    Self {
      registry,
      env,
      max_depth,
      marks: HashMap::new(),
      stack: Vec::new(),
      edges: HashMap::new(),
    }
  }

  /// Walk everything reachable from `root`.
  ///
  /// The path lives in an explicit frame stack, so chain length is bounded
  /// only by `max_depth`, never by the thread's call stack.
  fn visit(&mut self, root: &'a str) -> Result<(), ResolutionError> {
    let mut frames: Vec<Frame<'a>> = Vec::new();
    if let Some(frame) = self.enter(root)? {
      frames.push(frame);
    }

    while let Some(frame) = frames.last_mut() {
      match frame.active.get(frame.next).copied() {
        Some(edge) => {
          frame.next += 1;
          if let Some(child) = self.enter(edge.name)? {
            frames.push(child);
          }
        }
        None => {
          if let Some(done) = frames.pop() {
            self.leave(done);
          }
        }
      }
    }
    Ok(())
  }

  /// Start visiting `name`. Returns `None` when it was already finished.
  fn enter(&mut self, name: &'a str) -> Result<Option<Frame<'a>>, ResolutionError> {
    match self.marks.get(name) {
      Some(Mark::Done) => return Ok(None),
      Some(Mark::InProgress) => {
        let start = self.stack.iter().position(|m| *m == name).unwrap_or(0);
        let mut path: Vec<String> = self.stack[start..].iter().map(|m| m.to_string()).collect();
        path.push(name.to_string());
        return Err(ResolutionError::CyclicDependency { path });
      }
      None => {}
    }

    if self.stack.len() >= self.max_depth {
      return Err(ResolutionError::DepthExceeded {
        limit: self.max_depth,
        module: name.to_string(),
      });
    }

    let registry = self.registry;
    let Some(module) = registry.get(name) else {
      return Err(ResolutionError::UnknownModule {
        name: name.to_string(),
        parent: self.stack.last().map(|m| m.to_string()),
      });
    };

    self.marks.insert(name, Mark::InProgress);
    self.stack.push(name);
    trace!(module = name, depth = self.stack.len(), "visiting module");

    let mut active = Vec::new();
    for edge in module.effective_edges(self.env) {
      let Some(dependency) = registry.get(edge.name) else {
        return Err(ResolutionError::UnknownModule {
          name: edge.name.to_string(),
          parent: Some(name.to_string()),
        });
      };
      if !dependency.is_available(self.env) {
        debug!(
          module = name,
          dependency = edge.name,
          kind = %edge.kind,
          "dropping edge to module unavailable in this environment"
        );
        continue;
      }
      active.push(edge);
    }

    Ok(Some(Frame { name, active, next: 0 }))
  }

  fn leave(&mut self, frame: Frame<'a>) {
    self.stack.pop();
    self.marks.insert(frame.name, Mark::Done);
    self.edges.insert(frame.name, frame.active);
  }
}

/// Resolve `target` for `env` with default options.
pub fn resolve(
  target: &TargetDescriptor,
  registry: &ModuleRegistry,
  env: &Environment,
) -> Result<BuildPlan, ResolutionError> {
  resolve_with(target, registry, env, &ResolveOptions::default())
}

/// Resolve `target` for `env`.
pub fn resolve_with(
  target: &TargetDescriptor,
  registry: &ModuleRegistry,
  env: &Environment,
  options: &ResolveOptions,
) -> Result<BuildPlan, ResolutionError> {
  debug!(target = target.name(), environment = %env, "resolving target");

  for root in target.root_modules() {
    if !registry.contains(root) {
      return Err(ResolutionError::UnknownModule {
        name: root.clone(),
        parent: None,
      });
    }
  }

  let mut walker = Walker::new(registry, env, options.max_depth);
  let mut roots: Vec<&str> = Vec::new();
  for root in target.root_modules() {
    let available = registry.get(root).is_some_and(|m| m.is_available(env));
    if !available {
      warn!(module = %root, environment = %env, "root module is unavailable in this environment, skipping");
      continue;
    }
    roots.push(root.as_str());
    walker.visit(root)?;
  }

  // Distinct link dependencies per module, in edge order.
  let mut link_deps: HashMap<&str, Vec<&str>> = HashMap::new();
  let mut link_edges: HashMap<&str, Vec<(&str, DependencyKind)>> = HashMap::new();
  let mut linked: HashSet<&str> = roots.iter().copied().collect();
  let mut loaded: HashSet<&str> = HashSet::new();

  for (&module, edges) in &walker.edges {
    let deps = link_deps.entry(module).or_default();
    let kinds = link_edges.entry(module).or_default();
    for edge in edges {
      if edge.kind.is_link() {
        linked.insert(edge.name);
        kinds.push((edge.name, edge.kind));
        if !deps.contains(&edge.name) {
          deps.push(edge.name);
        }
      } else {
        loaded.insert(edge.name);
      }
    }
  }

  let ordered_modules = order_modules(registry, &walker.edges, &link_deps);

  let link_set: Vec<String> = ordered_modules
    .iter()
    .filter(|m| linked.contains(m.as_str()))
    .cloned()
    .collect();
  let dynamic_set: Vec<String> = ordered_modules
    .iter()
    .filter(|m| loaded.contains(m.as_str()) && !linked.contains(m.as_str()))
    .cloned()
    .collect();

  let pch_modes = ordered_modules
    .iter()
    .filter_map(|m| registry.get(m).map(|d| (m.clone(), d.pch_mode)))
    .collect();

  let link_dependencies: BTreeMap<String, Vec<String>> = ordered_modules
    .iter()
    .map(|m| {
      let deps = link_deps
        .get(m.as_str())
        .map(|deps| deps.iter().map(|d| d.to_string()).collect())
        .unwrap_or_default();
      (m.clone(), deps)
    })
    .collect();

  let defaults = definitions::default_definitions(target, env);
  let definitions = definitions::compute(registry, &ordered_modules, &link_edges, &defaults);

  debug!(
    target = target.name(),
    environment = %env,
    modules = ordered_modules.len(),
    linked = link_set.len(),
    dynamic = dynamic_set.len(),
    "resolved target"
  );

  Ok(BuildPlan {
    target: target.into(),
    environment: env.clone(),
    ordered_modules,
    link_set,
    dynamic_set,
    pch_modes,
    definitions,
    link_dependencies,
  })
}

/// Order every visited module after its link dependencies.
///
/// Kahn's algorithm over the link edges, always taking the ready module that
/// was declared first in the registry.
fn order_modules(
  registry: &ModuleRegistry,
  visited: &HashMap<&str, Vec<DependencyEdge<'_>>>,
  link_deps: &HashMap<&str, Vec<&str>>,
) -> Vec<String> {
  let mut pending: HashMap<&str, usize> = HashMap::new();
  let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
  for (&module, deps) in link_deps {
    pending.insert(module, deps.len());
    for &dep in deps {
      dependents.entry(dep).or_default().push(module);
    }
  }

  let mut ready: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
  for (index, module) in registry.iter().enumerate() {
    if visited.contains_key(module.name.as_str()) && pending.get(module.name.as_str()).copied().unwrap_or(0) == 0 {
      ready.push(Reverse(index));
    }
  }

  let declared: Vec<&str> = registry.iter().map(|m| m.name.as_str()).collect();
  let mut ordered = Vec::with_capacity(visited.len());
  while let Some(Reverse(index)) = ready.pop() {
    let module = declared[index];
    ordered.push(module.to_string());
    for &dependent in dependents.get(module).map(Vec::as_slice).unwrap_or(&[]) {
      if let Some(count) = pending.get_mut(dependent) {
        *count -= 1;
        if *count == 0
          && let Some(position) = registry.position(dependent)
        {
          ready.push(Reverse(position));
        }
      }
    }
  }

  debug_assert_eq!(ordered.len(), visited.len(), "link graph must be acyclic after traversal");
  ordered
}
