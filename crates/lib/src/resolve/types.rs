//! Types produced by dependency resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::environment::Environment;
use crate::module::PchMode;
use crate::target::{BuildSettingsVersion, TargetDescriptor, TargetKind};

/// Summary of the target a plan was resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTarget {
  pub name: String,
  pub kind: TargetKind,
  pub build_settings_version: BuildSettingsVersion,
}

impl From<&TargetDescriptor> for PlanTarget {
  fn from(target: &TargetDescriptor) -> Self {
    Self {
      name: target.name().to_string(),
      kind: target.kind(),
      build_settings_version: target.build_settings_version().clone(),
    }
  }
}

/// The result of resolving a target for one environment.
///
/// `ordered_modules` lists every reachable module with each module after all
/// of its link dependencies. `link_set` and `dynamic_set` are disjoint subsets
/// of it, both in `ordered_modules` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
  pub target: PlanTarget,
  pub environment: Environment,
  pub ordered_modules: Vec<String>,
  pub link_set: Vec<String>,
  pub dynamic_set: Vec<String>,
  pub pch_modes: BTreeMap<String, PchMode>,
  /// Effective compile definitions per module.
  pub definitions: BTreeMap<String, Vec<String>>,
  /// Active public and private dependency names per module, in edge order.
  pub link_dependencies: BTreeMap<String, Vec<String>>,
}

impl BuildPlan {
  pub fn contains(&self, module: &str) -> bool {
    self.ordered_modules.iter().any(|m| m == module)
  }

  pub fn is_linked(&self, module: &str) -> bool {
    self.link_set.iter().any(|m| m == module)
  }

  pub fn is_dynamic(&self, module: &str) -> bool {
    self.dynamic_set.iter().any(|m| m == module)
  }

  /// Position of `module` in `ordered_modules`.
  pub fn position(&self, module: &str) -> Option<usize> {
    self.ordered_modules.iter().position(|m| m == module)
  }

  pub fn len(&self) -> usize {
    self.ordered_modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ordered_modules.is_empty()
  }
}

/// Errors that abort resolution. No partial plan is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
  /// A root or an active edge names a module that is not declared.
  #[error("{}", describe_unknown(.name, .parent.as_deref()))]
  UnknownModule { name: String, parent: Option<String> },

  /// A module was reached again while still being visited.
  #[error("cyclic dependency: {}", .path.join(" -> "))]
  CyclicDependency { path: Vec<String> },

  #[error("dependency chain exceeds the depth limit of {limit} at module '{module}'")]
  DepthExceeded { limit: usize, module: String },
}

fn describe_unknown(name: &str, parent: Option<&str>) -> String {
  match parent {
    Some(parent) => format!("unknown module '{}' (referenced by '{}')", name, parent),
    None => format!("unknown root module '{}'", name),
  }
}

impl ResolutionError {
  /// Short, stable name of the error kind.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::UnknownModule { .. } => "UnknownModule",
      Self::CyclicDependency { .. } => "CyclicDependency",
      Self::DepthExceeded { .. } => "DepthExceeded",
    }
  }
}
