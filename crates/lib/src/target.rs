//! Target descriptors.
//!
//! A [`TargetDescriptor`] names the artifact being assembled and the root
//! modules it is built from. It is constructed once per invocation and is
//! immutable afterwards.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
  #[error("root module '{0}' is listed more than once")]
  DuplicateRoot(String),
}

/// Kind of artifact a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
  Executable,
  SharedLibrary,
  StaticLibrary,
  TestHarness,
}

impl TargetKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Executable => "executable",
      Self::SharedLibrary => "shared_library",
      Self::StaticLibrary => "static_library",
      Self::TestHarness => "test_harness",
    }
  }
}

impl fmt::Display for TargetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Opaque tag selecting the default flag set for a target.
///
/// Recognised tags are `V1`, `V2` and `Latest`; any other tag is carried
/// through untouched and selects no extra defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildSettingsVersion(pub String);

impl BuildSettingsVersion {
  pub fn new(tag: impl Into<String>) -> Self {
    Self(tag.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Definitions this settings version adds to every module.
  pub fn default_definitions(&self) -> &'static [&'static str] {
    match self.0.as_str() {
      "V2" => &["STRICT_INCLUDES=1"],
      "Latest" => &["STRICT_INCLUDES=1", "MODERN_CONFORMANCE=1"],
      _ => &[],
    }
  }
}

impl Default for BuildSettingsVersion {
  fn default() -> Self {
    Self::new("V1")
  }
}

impl fmt::Display for BuildSettingsVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// The artifact being built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTarget")]
pub struct TargetDescriptor {
  name: String,
  kind: TargetKind,
  build_settings_version: BuildSettingsVersion,
  root_modules: Vec<String>,
}

/// Target as written in a project file, before validation.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
  name: Option<String>,
  kind: TargetKind,
  #[serde(default)]
  build_settings_version: BuildSettingsVersion,
  root_modules: Vec<String>,
}

impl TryFrom<RawTarget> for TargetDescriptor {
  type Error = TargetError;

  fn try_from(raw: RawTarget) -> Result<Self, Self::Error> {
    let target = Self::new(raw.kind, raw.build_settings_version, raw.root_modules)?;
    Ok(match raw.name {
      Some(name) => target.with_name(name),
      None => target,
    })
  }
}

impl TargetDescriptor {
  /// Create a target. Root module names must be unique.
  ///
  /// The target is named after its first root until [`with_name`](Self::with_name) is used.
  pub fn new(
    kind: TargetKind,
    build_settings_version: BuildSettingsVersion,
    root_modules: impl IntoIterator<Item = impl Into<String>>,
  ) -> Result<Self, TargetError> {
    let root_modules: Vec<String> = root_modules.into_iter().map(Into::into).collect();

    let mut seen = HashSet::new();
    for root in &root_modules {
      if !seen.insert(root.as_str()) {
        return Err(TargetError::DuplicateRoot(root.clone()));
      }
    }

    let name = root_modules.first().cloned().unwrap_or_else(|| "unnamed".to_string());
    Ok(Self {
      name,
      kind,
      build_settings_version,
      root_modules,
    })
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> TargetKind {
    self.kind
  }

  pub fn build_settings_version(&self) -> &BuildSettingsVersion {
    &self.build_settings_version
  }

  pub fn root_modules(&self) -> &[String] {
    &self.root_modules
  }
}
