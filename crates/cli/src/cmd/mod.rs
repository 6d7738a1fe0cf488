mod check;
mod info;
mod matrix;
mod resolve;

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Args;

use modplan_lib::{Architecture, Configuration, Environment, Platform, ProjectConfig};

pub use check::cmd_check;
pub use info::cmd_info;
pub use matrix::cmd_matrix;
pub use resolve::cmd_resolve;

/// Flags selecting the environment to resolve for. Unset values fall back to the host.
#[derive(Args, Debug, Default)]
pub struct EnvArgs {
  /// Target platform (Win32, Win64, Linux, Mac, IOS, Android, or any other name)
  #[arg(short, long)]
  pub platform: Option<String>,

  /// Target architecture (x86, x86_64, arm32, arm64)
  #[arg(short, long)]
  pub arch: Option<String>,

  /// Build configuration (Debug, DebugGame, Development, Test, Shipping)
  #[arg(short, long)]
  pub configuration: Option<String>,

  /// Feature flag, as NAME or NAME=true|false (repeatable)
  #[arg(short, long = "feature")]
  pub features: Vec<String>,
}

impl EnvArgs {
  pub fn to_environment(&self) -> Result<Environment> {
    let configuration = parse_configuration(self.configuration.as_deref())?;
    let host = Environment::host(configuration);

    let platform = self.platform.clone().map(Platform::from);
    let architecture = match (&self.arch, &platform) {
      (Some(arch), _) => Architecture::from(arch.clone()),
      (None, Some(platform)) => platform.default_architecture(),
      (None, None) => host.architecture.clone(),
    };

    let environment = Environment::new(platform.unwrap_or(host.platform), architecture, configuration);
    apply_features(environment, &self.features)
  }
}

pub fn parse_configuration(value: Option<&str>) -> Result<Configuration> {
  match value {
    Some(value) => value
      .parse::<Configuration>()
      .with_context(|| format!("Invalid --configuration '{}'", value)),
    None => Ok(Configuration::default()),
  }
}

/// Parse `NAME` or `NAME=VALUE` into a feature flag.
pub fn parse_feature(flag: &str) -> Result<(String, bool)> {
  let (name, value) = match flag.split_once('=') {
    Some((name, value)) => (name.trim(), Some(value.trim())),
    None => (flag.trim(), None),
  };
  if name.is_empty() {
    bail!("Invalid --feature '{}': missing name", flag);
  }

  let enabled = match value.map(str::to_ascii_lowercase).as_deref() {
    None | Some("true") | Some("1") | Some("on") | Some("yes") => true,
    Some("false") | Some("0") | Some("off") | Some("no") => false,
    Some(other) => bail!("Invalid --feature '{}': '{}' is not a boolean", flag, other),
  };
  Ok((name.to_string(), enabled))
}

pub fn apply_features(mut environment: Environment, features: &[String]) -> Result<Environment> {
  for flag in features {
    let (name, enabled) = parse_feature(flag)?;
    environment = environment.with_feature(name, enabled);
  }
  Ok(environment)
}

pub fn load_project(path: &Path) -> Result<ProjectConfig> {
  ProjectConfig::load(path).with_context(|| format!("Failed to load project: {}", path.display()))
}
