//! Module descriptors.
//!
//! A [`ModuleDescriptor`] is the declarative record of one compilable unit:
//! its name, precompiled-header mode, dependency lists and compile
//! definitions. Dependencies come in three kinds (see [`DependencyKind`]) and
//! may be gated by a [`Predicate`] through [`ConditionalDependencies`] groups.
//!
//! # Example
//!
//! ```json
//! {
//!   "name": "Grip",
//!   "pch": "use_shared_or_explicit",
//!   "public": ["Core", "Engine"],
//!   "private": ["Slate", "Sockets"],
//!   "conditional": [
//!     {
//!       "when": "feature(USE_STEAM) && platform(Win32, Win64, Linux, Mac)",
//!       "public": ["Steamworks"],
//!       "dynamic": ["OnlineSubsystemSteam"]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::predicate::Predicate;

/// How a module uses precompiled headers. Passed through to the compiler driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PchMode {
  #[default]
  None,
  UseExplicit,
  UseSharedOrExplicit,
}

/// The relation a dependency edge expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
  /// Linked, and its interface is re-exposed to dependents.
  Public,
  /// Linked, used internally only.
  Private,
  /// Resolved and validated, but loaded by the runtime instead of linked.
  Dynamic,
}

impl DependencyKind {
  /// Whether edges of this kind contribute to the link line and ordering.
  pub fn is_link(self) -> bool {
    matches!(self, Self::Public | Self::Private)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Public => "public",
      Self::Private => "private",
      Self::Dynamic => "dynamic",
    }
  }
}

impl fmt::Display for DependencyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Dependencies that only apply when `when` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionalDependencies {
  pub when: Predicate,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub public: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub private: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub dynamic: Vec<String>,
}

impl ConditionalDependencies {
  fn names(&self, kind: DependencyKind) -> &[String] {
    match kind {
      DependencyKind::Public => &self.public,
      DependencyKind::Private => &self.private,
      DependencyKind::Dynamic => &self.dynamic,
    }
  }
}

/// One declared dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge<'a> {
  /// Name of the module depended upon.
  pub name: &'a str,
  pub kind: DependencyKind,
  /// Gate for this edge; `None` means unconditional.
  pub predicate: Option<&'a Predicate>,
}

impl DependencyEdge<'_> {
  /// Whether this edge is active in `env`.
  pub fn is_active(&self, env: &Environment) -> bool {
    self.predicate.is_none_or(|p| p.evaluate(env))
  }
}

/// Declarative description of a single module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDescriptor {
  pub name: String,

  #[serde(default, rename = "pch")]
  pub pch_mode: PchMode,

  /// Availability of the module itself. When this is false the module is
  /// inert for that environment and edges pointing at it are dropped.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub when: Option<Predicate>,

  #[serde(default)]
  pub public: Vec<String>,

  #[serde(default)]
  pub private: Vec<String>,

  #[serde(default)]
  pub dynamic: Vec<String>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub conditional: Vec<ConditionalDependencies>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub public_definitions: Vec<String>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub private_definitions: Vec<String>,
}

const KINDS: [DependencyKind; 3] = [DependencyKind::Public, DependencyKind::Private, DependencyKind::Dynamic];

impl ModuleDescriptor {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      pch_mode: PchMode::None,
      when: None,
      public: Vec::new(),
      private: Vec::new(),
      dynamic: Vec::new(),
      conditional: Vec::new(),
      public_definitions: Vec::new(),
      private_definitions: Vec::new(),
    }
  }

  pub fn with_pch(mut self, mode: PchMode) -> Self {
    self.pch_mode = mode;
    self
  }

  pub fn available_when(mut self, predicate: Predicate) -> Self {
    self.when = Some(predicate);
    self
  }

  pub fn with_public<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.public.extend(names.into_iter().map(Into::into));
    self
  }

  pub fn with_private<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.private.extend(names.into_iter().map(Into::into));
    self
  }

  pub fn with_dynamic<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.dynamic.extend(names.into_iter().map(Into::into));
    self
  }

  /// Add dependencies of `kind` that only apply when `when` holds.
  pub fn with_conditional<I, S>(mut self, when: Predicate, kind: DependencyKind, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    let mut group = ConditionalDependencies {
      when,
      public: Vec::new(),
      private: Vec::new(),
      dynamic: Vec::new(),
    };
    match kind {
      DependencyKind::Public => group.public = names,
      DependencyKind::Private => group.private = names,
      DependencyKind::Dynamic => group.dynamic = names,
    }
    self.conditional.push(group);
    self
  }

  pub fn with_public_definitions<I, S>(mut self, defs: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.public_definitions.extend(defs.into_iter().map(Into::into));
    self
  }

  pub fn with_private_definitions<I, S>(mut self, defs: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.private_definitions.extend(defs.into_iter().map(Into::into));
    self
  }

  fn unconditional(&self, kind: DependencyKind) -> &[String] {
    match kind {
      DependencyKind::Public => &self.public,
      DependencyKind::Private => &self.private,
      DependencyKind::Dynamic => &self.dynamic,
    }
  }

  /// Every declared edge in declaration order: unconditional public, private
  /// and dynamic lists first, then each conditional group in turn.
  pub fn edges(&self) -> impl Iterator<Item = DependencyEdge<'_>> {
    let unconditional = KINDS.into_iter().flat_map(move |kind| {
      self.unconditional(kind).iter().map(move |name| DependencyEdge {
        name,
        kind,
        predicate: None,
      })
    });

    let gated = self.conditional.iter().flat_map(|group| {
      KINDS.into_iter().flat_map(move |kind| {
        group.names(kind).iter().map(move |name| DependencyEdge {
          name,
          kind,
          predicate: Some(&group.when),
        })
      })
    });

    unconditional.chain(gated)
  }

  /// Edges active in `env`, with repeated (name, kind) pairs collapsed.
  pub fn effective_edges(&self, env: &Environment) -> Vec<DependencyEdge<'_>> {
    let mut seen = HashSet::new();
    self
      .edges()
      .filter(|edge| edge.is_active(env))
      .filter(|edge| seen.insert((edge.name, edge.kind)))
      .collect()
  }

  /// Whether this module exists at all in `env`.
  pub fn is_available(&self, env: &Environment) -> bool {
    self.when.as_ref().is_none_or(|p| p.evaluate(env))
  }
}
