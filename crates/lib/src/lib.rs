//! modplan-lib: Conditional module dependency resolution
//!
//! This crate turns a declarative set of module descriptors into a
//! deterministic, platform-correct build plan:
//! - `Environment`: the platform, architecture, configuration and feature flags being built for
//! - `Predicate`: boolean conditions over an environment that gate dependencies
//! - `ModuleDescriptor` / `ModuleRegistry`: the declared modules and their dependency edges
//! - `TargetDescriptor`: the artifact being assembled and its root modules
//! - `resolve`: walks the module graph and produces a `BuildPlan`
//! - `emit`: serializes a plan for the external toolchain driver

pub mod config;
pub mod consts;
pub mod definitions;
pub mod emit;
pub mod environment;
pub mod module;
pub mod predicate;
pub mod registry;
pub mod resolve;
pub mod target;
pub mod util;

pub use config::{ConfigError, ProjectConfig};
pub use emit::{EmitError, JsonFileSink, PlanSink, SerializedPlan, emit};
pub use environment::{Architecture, Configuration, Environment, Platform};
pub use module::{DependencyEdge, DependencyKind, ModuleDescriptor, PchMode};
pub use predicate::{Predicate, PredicateError, evaluate};
pub use registry::{ModuleRegistry, RegistryError, RegistryIssue};
pub use resolve::{
  BuildPlan, MatrixEntry, PlanTarget, ResolutionError, ResolveOptions, resolve, resolve_matrix, resolve_with,
};
pub use target::{BuildSettingsVersion, TargetDescriptor, TargetError, TargetKind};
pub use util::hash::{Hashable, PlanHash};
