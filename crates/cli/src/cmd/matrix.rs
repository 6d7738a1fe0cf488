//! Implementation of the `modplan matrix` command.

use std::path::Path;

use anyhow::{Result, bail};
use serde_json::json;

use modplan_lib::{Environment, Hashable, Platform, ResolveOptions, emit, resolve_matrix};

use super::{apply_features, load_project, parse_configuration};
use crate::output::{print_error, print_json, print_success, truncate_hash};

pub fn cmd_matrix(project: &Path, configuration: Option<&str>, features: &[String], json: bool) -> Result<()> {
  let config = load_project(project)?;
  let configuration = parse_configuration(configuration)?;

  let environments = Platform::known()
    .into_iter()
    .map(|platform| apply_features(Environment::for_platform(platform, configuration), features))
    .collect::<Result<Vec<_>>>()?;

  let entries = resolve_matrix(&config.target, &config.registry, &environments, &ResolveOptions::from_env());
  let failures = entries.iter().filter(|e| e.result.is_err()).count();

  if json {
    let mut items = Vec::with_capacity(entries.len());
    for entry in &entries {
      items.push(match &entry.result {
        Ok(plan) => {
          let serialized = emit(plan);
          let fingerprint = serialized.compute_hash()?;
          json!({ "environment": entry.environment, "fingerprint": fingerprint, "plan": serialized })
        }
        Err(e) => json!({ "environment": entry.environment, "error": e.to_string(), "kind": e.kind() }),
      });
    }
    print_json(&items)?;
  } else {
    for entry in &entries {
      match &entry.result {
        Ok(plan) => {
          let fingerprint = emit(plan).compute_hash()?;
          print_success(&format!(
            "{}: {} modules ({} linked, {} dynamic) {}",
            entry.environment,
            plan.len(),
            plan.link_set.len(),
            plan.dynamic_set.len(),
            truncate_hash(&fingerprint.0)
          ));
        }
        Err(e) => print_error(&format!("{}: {}", entry.environment, e)),
      }
    }
  }

  if failures > 0 {
    bail!("{} of {} environments failed to resolve", failures, entries.len());
  }
  Ok(())
}
