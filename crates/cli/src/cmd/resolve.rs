//! Implementation of the `modplan resolve` command.
//!
//! Loads a project, resolves its target for one environment and prints the
//! plan, optionally writing the serialized plan to a file.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use modplan_lib::{Hashable, JsonFileSink, PlanSink, ResolveOptions, emit, resolve_with};

use super::{EnvArgs, load_project};
use crate::output::{print_info, print_json, print_stat, print_success, symbols, truncate_hash};

pub fn cmd_resolve(
  project: &Path,
  env_args: &EnvArgs,
  max_depth: Option<usize>,
  output: Option<&Path>,
  json: bool,
  verbose: bool,
) -> Result<()> {
  let config = load_project(project)?;
  let environment = env_args.to_environment()?;

  let mut options = ResolveOptions::from_env();
  if let Some(depth) = max_depth {
    if depth == 0 {
      bail!("--max-depth must be at least 1");
    }
    options.max_depth = depth;
  }
  debug!(project = %project.display(), environment = %environment, max_depth = options.max_depth, "resolving project");

  let plan = resolve_with(&config.target, &config.registry, &environment, &options).map_err(|e| {
    let context = format!(
      "{} while resolving '{}' for {}",
      e.kind(),
      config.target.name(),
      environment
    );
    anyhow::Error::new(e).context(context)
  })?;

  let serialized = emit(&plan);
  let hash = serialized.compute_hash().context("Failed to compute plan fingerprint")?;

  if let Some(path) = output {
    JsonFileSink::new(path)
      .apply(&serialized)
      .with_context(|| format!("Failed to write plan: {}", path.display()))?;
  }

  if json {
    return print_json(&serialized);
  }

  print_success(&format!("Resolved {} for {}", config.target.name(), environment));
  print_stat("Plan", truncate_hash(&hash.0));
  print_stat("Modules", &plan.len().to_string());
  print_stat("Linked", &plan.link_set.len().to_string());
  print_stat("Dynamic", &plan.dynamic_set.len().to_string());

  if !plan.is_empty() {
    println!();
    println!("Build order:");
    for (i, module) in plan.ordered_modules.iter().enumerate() {
      let tag = if plan.is_dynamic(module) { "dynamic" } else { "link" };
      println!("  {:>3}. {} ({})", i + 1, module, tag);

      if verbose {
        if let Some(deps) = plan.link_dependencies.get(module)
          && !deps.is_empty()
        {
          println!("       {} {}", symbols::ARROW, deps.join(", "));
        }
        if let Some(defs) = plan.definitions.get(module) {
          println!("       {} {}", symbols::INFO, defs.join(" "));
        }
      }
    }
  }

  if let Some(path) = output {
    println!();
    print_info(&format!("Wrote plan to {}", path.display()));
  }

  Ok(())
}
