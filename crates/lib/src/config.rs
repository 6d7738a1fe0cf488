//! Project files and resolver options.
//!
//! A project file is JSON holding a target and the declared modules:
//!
//! ```json
//! {
//!   "target": { "kind": "executable", "root_modules": ["App"] },
//!   "modules": [
//!     { "name": "Core" },
//!     { "name": "App", "public": ["Core"], "dynamic": ["Steam"] },
//!     { "name": "Steam", "when": "platform(Win64, Linux, Mac)" }
//!   ]
//! }
//! ```
//!
//! Predicates are written in their text form and parsed on load.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::{DEFAULT_MAX_DEPTH, MAX_DEPTH_ENV};
use crate::module::ModuleDescriptor;
use crate::registry::{ModuleRegistry, RegistryError};
use crate::target::TargetDescriptor;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read project file {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Malformed JSON, an unknown field, an invalid predicate or a duplicate root.
  #[error("invalid project file: {0}")]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Registry(#[from] RegistryError),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProject {
  target: TargetDescriptor,
  #[serde(default)]
  modules: Vec<ModuleDescriptor>,
}

/// A loaded project: one target plus the registry it resolves against.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
  pub target: TargetDescriptor,
  pub registry: ModuleRegistry,
}

impl ProjectConfig {
  /// Load a project from a JSON file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    debug!(path = %path.display(), "loading project file");
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&content)
  }

  /// Parse a project from JSON text.
  pub fn from_json(content: &str) -> Result<Self, ConfigError> {
    let raw: RawProject = serde_json::from_str(content)?;
    let registry = ModuleRegistry::new(raw.modules)?;
    debug!(
      target = raw.target.name(),
      modules = registry.len(),
      "parsed project"
    );
    Ok(Self {
      target: raw.target,
      registry,
    })
  }
}

/// Tunables for a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
  /// Longest dependency chain, counted in modules, before resolution fails.
  pub max_depth: usize,
}

impl Default for ResolveOptions {
  fn default() -> Self {
    Self {
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

impl ResolveOptions {
  /// Defaults, overridden by `MODPLAN_MAX_DEPTH` when it holds a positive integer.
  pub fn from_env() -> Self {
    let mut options = Self::default();
    if let Ok(value) = std::env::var(MAX_DEPTH_ENV) {
      match value.trim().parse::<usize>() {
        Ok(depth) if depth > 0 => options.max_depth = depth,
        _ => warn!(variable = MAX_DEPTH_ENV, value = %value, "ignoring invalid depth limit"),
      }
    }
    options
  }
}
