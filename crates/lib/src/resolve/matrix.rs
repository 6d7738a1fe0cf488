//! Resolving one target for many environments at once.

use rayon::prelude::*;
use tracing::info;

use super::{BuildPlan, ResolutionError, ResolveOptions, resolve_with};
use crate::environment::Environment;
use crate::registry::ModuleRegistry;
use crate::target::TargetDescriptor;

/// Outcome of resolving a target for a single environment of a matrix.
#[derive(Debug, Clone)]
pub struct MatrixEntry {
  pub environment: Environment,
  pub result: Result<BuildPlan, ResolutionError>,
}

/// Resolve `target` for every environment in parallel.
///
/// Entries come back in the same order as `environments`; one failing
/// environment does not affect the others.
pub fn resolve_matrix(
  target: &TargetDescriptor,
  registry: &ModuleRegistry,
  environments: &[Environment],
  options: &ResolveOptions,
) -> Vec<MatrixEntry> {
  info!(
    target = target.name(),
    environments = environments.len(),
    "resolving environment matrix"
  );

  environments
    .par_iter()
    .map(|env| MatrixEntry {
      environment: env.clone(),
      result: resolve_with(target, registry, env, options),
    })
    .collect()
}
