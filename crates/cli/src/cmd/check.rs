//! Implementation of the `modplan check` command.
//!
//! Validates every declared edge, gated or not, without resolving for any
//! particular environment.

use std::path::Path;

use anyhow::{Result, bail};

use super::load_project;
use crate::output::{print_stat, print_success, print_warning};

pub fn cmd_check(project: &Path) -> Result<()> {
  let config = load_project(project)?;

  let mut issues: Vec<String> = config
    .target
    .root_modules()
    .iter()
    .filter(|root| !config.registry.contains(root))
    .map(|root| format!("root module '{}' is not declared", root))
    .collect();
  issues.extend(config.registry.validate().iter().map(ToString::to_string));

  if issues.is_empty() {
    print_success(&format!("{} is valid", project.display()));
    print_stat("Target", config.target.name());
    print_stat("Modules", &config.registry.len().to_string());
    return Ok(());
  }

  for issue in &issues {
    print_warning(issue);
  }
  bail!("{} issue(s) found in {}", issues.len(), project.display())
}
