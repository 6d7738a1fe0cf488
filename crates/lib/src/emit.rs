//! Build plan emission.
//!
//! [`emit`] turns a [`BuildPlan`] into the [`SerializedPlan`] consumed by the
//! external toolchain driver. A [`PlanSink`] is the narrow interface through
//! which a plan is handed to that driver.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::environment::Environment;
use crate::module::PchMode;
use crate::resolve::{BuildPlan, PlanTarget};
use crate::util::hash::Hashable;

#[derive(Debug, Error)]
pub enum EmitError {
  #[error("failed to serialize plan: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("failed to write plan to {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Wire form of a build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedPlan {
  pub target: PlanTarget,
  pub environment: Environment,
  pub ordered_modules: Vec<String>,
  pub link_set: Vec<String>,
  pub dynamic_set: Vec<String>,
  pub precompiled_header_modes: BTreeMap<String, PchMode>,
  pub definitions: BTreeMap<String, Vec<String>>,
}

impl Hashable for SerializedPlan {}

impl SerializedPlan {
  /// Pretty JSON with a trailing newline.
  pub fn to_json_pretty(&self) -> Result<String, EmitError> {
    let mut json = serde_json::to_string_pretty(self)?;
    json.push('\n');
    Ok(json)
  }
}

/// Serialize a resolved plan. Module order is preserved exactly.
pub fn emit(plan: &BuildPlan) -> SerializedPlan {
  SerializedPlan {
    target: plan.target.clone(),
    environment: plan.environment.clone(),
    ordered_modules: plan.ordered_modules.clone(),
    link_set: plan.link_set.clone(),
    dynamic_set: plan.dynamic_set.clone(),
    precompiled_header_modes: plan.pch_modes.clone(),
    definitions: plan.definitions.clone(),
  }
}

/// Receives finished plans on behalf of the toolchain driver.
pub trait PlanSink {
  fn apply(&mut self, plan: &SerializedPlan) -> Result<(), EmitError>;
}

/// Collects plans in memory.
impl PlanSink for Vec<SerializedPlan> {
  fn apply(&mut self, plan: &SerializedPlan) -> Result<(), EmitError> {
    self.push(plan.clone());
    Ok(())
  }
}

/// Writes each plan to a JSON file, replacing any previous content.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
  path: PathBuf,
}

impl JsonFileSink {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl PlanSink for JsonFileSink {
  fn apply(&mut self, plan: &SerializedPlan) -> Result<(), EmitError> {
    let json = plan.to_json_pretty()?;
    let io_err = |source| EmitError::Io {
      path: self.path.clone(),
      source,
    };

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(&self.path, json).map_err(io_err)?;

    info!(path = %self.path.display(), modules = plan.ordered_modules.len(), "wrote build plan");
    Ok(())
  }
}
