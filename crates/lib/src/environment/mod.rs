//! Build environment description.
//!
//! An [`Environment`] is the explicit record every resolution is evaluated
//! against: which platform and architecture are being targeted, which
//! configuration, and which named feature flags are switched on. There is no
//! process-wide "active" environment; callers pass one to each resolution.

pub mod arch;
pub mod configuration;
pub mod platform;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use arch::Architecture;
pub use configuration::{Configuration, UnknownConfiguration};
pub use platform::Platform;

/// The environment a target is resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
  pub platform: Platform,
  pub architecture: Architecture,
  #[serde(default)]
  pub configuration: Configuration,
  /// Named compile-time feature toggles. Absent flags read as disabled.
  #[serde(default)]
  pub features: BTreeMap<String, bool>,
}

impl Environment {
  pub fn new(platform: Platform, architecture: Architecture, configuration: Configuration) -> Self {
    Self {
      platform,
      architecture,
      configuration,
      features: BTreeMap::new(),
    }
  }

  /// An environment for `platform` using its default architecture.
  pub fn for_platform(platform: Platform, configuration: Configuration) -> Self {
    let architecture = platform.default_architecture();
    Self::new(platform, architecture, configuration)
  }

  /// Describe the running host.
  ///
  /// Hosts without a known platform or architecture identifier fall back to
  /// `Other` carrying the raw OS / arch name.
  pub fn host(configuration: Configuration) -> Self {
    let platform = Platform::current().unwrap_or_else(|| Platform::Other(std::env::consts::OS.to_string()));
    let architecture =
      Architecture::current().unwrap_or_else(|| Architecture::Other(std::env::consts::ARCH.to_string()));
    Self::new(platform, architecture, configuration)
  }

  /// Set a feature flag, returning the updated environment.
  pub fn with_feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
    self.features.insert(name.into(), enabled);
    self
  }

  /// Whether the named feature flag is enabled.
  pub fn feature(&self, name: &str) -> bool {
    self.features.get(name).copied().unwrap_or(false)
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}-{}", self.platform, self.architecture, self.configuration)
  }
}
