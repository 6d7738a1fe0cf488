//! The module registry.
//!
//! A [`ModuleRegistry`] is the immutable table of every declared module. It
//! keeps declaration order, which the resolver uses to break ties between
//! modules that have no ordering constraint between them.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::module::{DependencyKind, ModuleDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
  #[error("module '{0}' is declared more than once")]
  DuplicateModule(String),
}

/// A problem found by [`ModuleRegistry::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryIssue {
  /// `module` references `dependency`, which is not declared.
  UnknownReference {
    module: String,
    dependency: String,
    kind: DependencyKind,
    gated: bool,
  },
  /// `module` lists itself as a dependency.
  SelfReference { module: String, kind: DependencyKind },
}

impl fmt::Display for RegistryIssue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RegistryIssue::UnknownReference {
        module,
        dependency,
        kind,
        gated,
      } => {
        let gated = if *gated { "conditional " } else { "" };
        write!(
          f,
          "module '{}' has a {}{} dependency on undeclared module '{}'",
          module, gated, kind, dependency
        )
      }
      RegistryIssue::SelfReference { module, kind } => {
        write!(f, "module '{}' lists itself as a {} dependency", module, kind)
      }
    }
  }
}

/// Declaration-ordered, name-indexed collection of module descriptors.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
  modules: Vec<ModuleDescriptor>,
  index: HashMap<String, usize>,
}

impl ModuleRegistry {
  /// Build a registry, keeping the order in which modules are given.
  pub fn new(modules: impl IntoIterator<Item = ModuleDescriptor>) -> Result<Self, RegistryError> {
    let mut registry = Self::default();
    for module in modules {
      if registry.index.contains_key(&module.name) {
        return Err(RegistryError::DuplicateModule(module.name));
      }
      registry.index.insert(module.name.clone(), registry.modules.len());
      registry.modules.push(module);
    }
    Ok(registry)
  }

  pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
    self.index.get(name).map(|&i| &self.modules[i])
  }

  /// Declaration position of `name`.
  pub fn position(&self, name: &str) -> Option<usize> {
    self.index.get(name).copied()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  /// Modules in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
    self.modules.iter()
  }

  /// Check every declared edge, gated or not, independently of any environment.
  ///
  /// Resolution only notices a bad reference when the edge is active for the
  /// environment being resolved; this catches the rest.
  pub fn validate(&self) -> Vec<RegistryIssue> {
    let mut issues = Vec::new();
    for module in &self.modules {
      for edge in module.edges() {
        if edge.name == module.name {
          issues.push(RegistryIssue::SelfReference {
            module: module.name.clone(),
            kind: edge.kind,
          });
        } else if !self.contains(edge.name) {
          issues.push(RegistryIssue::UnknownReference {
            module: module.name.clone(),
            dependency: edge.name.to_string(),
            kind: edge.kind,
            gated: edge.predicate.is_some(),
          });
        }
      }
    }
    issues
  }
}
