//! Platform predicates.
//!
//! A [`Predicate`] is a boolean expression over an [`Environment`]. Predicates
//! gate dependency edges and module availability. Evaluation is pure and
//! total: every predicate yields `true` or `false` for every environment, and
//! identifiers the evaluator does not recognise simply fail to match.
//!
//! # Text form
//!
//! Predicates are written in project files as strings:
//!
//! ```text
//! platform(Win64, Linux, Mac) && feature(USE_STEAM)
//! !config(Shipping) || arch(arm64)
//! ```
//!
//! See [`parse`] for the grammar. `Display` produces the canonical text form.
//! Every predicate returned by [`parse`] prints back to text that parses to an
//! equal predicate. Trees built in code that the grammar cannot express print
//! as an equivalent expression instead: an empty `platform`/`arch`/`config`
//! list prints as `false`, and a one-item `All`/`Any` prints as its item.
//! Identifiers that are not plain words (for example a feature named `A B`)
//! have no text form at all, so serializing such a predicate is an error.

mod parse;

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::environment::{Architecture, Configuration, Environment, Platform};

pub use parse::{PredicateError, parse};

/// A boolean condition over the build environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Predicate {
  /// Literal `true` / `false`.
  Const(bool),
  /// True when the environment's platform is one of the listed platforms.
  Platform(Vec<Platform>),
  /// True when the environment's architecture is one of the listed architectures.
  Architecture(Vec<Architecture>),
  /// True when the environment's configuration is one of the listed configurations.
  Configuration(Vec<Configuration>),
  /// True when the named feature flag is enabled.
  Feature(String),
  Not(Box<Predicate>),
  /// Conjunction. Empty is `true`.
  All(Vec<Predicate>),
  /// Disjunction. Empty is `false`.
  Any(Vec<Predicate>),
}

impl Predicate {
  pub fn platforms(platforms: impl IntoIterator<Item = Platform>) -> Self {
    Self::Platform(platforms.into_iter().collect())
  }

  pub fn architectures(architectures: impl IntoIterator<Item = Architecture>) -> Self {
    Self::Architecture(architectures.into_iter().collect())
  }

  pub fn configurations(configurations: impl IntoIterator<Item = Configuration>) -> Self {
    Self::Configuration(configurations.into_iter().collect())
  }

  pub fn feature(name: impl Into<String>) -> Self {
    Self::Feature(name.into())
  }

  pub fn negate(self) -> Self {
    Self::Not(Box::new(self))
  }

  /// Evaluate this predicate against an environment.
  pub fn evaluate(&self, env: &Environment) -> bool {
    match self {
      Self::Const(value) => *value,
      Self::Platform(platforms) => platforms.iter().any(|p| p.matches(&env.platform)),
      Self::Architecture(archs) => archs.iter().any(|a| a.matches(&env.architecture)),
      Self::Configuration(configs) => configs.contains(&env.configuration),
      Self::Feature(name) => env.feature(name),
      Self::Not(inner) => !inner.evaluate(env),
      Self::All(items) => items.iter().all(|p| p.evaluate(env)),
      Self::Any(items) => items.iter().any(|p| p.evaluate(env)),
    }
  }

  /// First identifier that cannot be written as a bare word in the text form.
  pub fn unwritable_identifier(&self) -> Option<&str> {
    match self {
      Self::Const(_) => None,
      Self::Platform(platforms) => platforms.iter().map(Platform::as_str).find(|n| !parse::is_ident(n)),
      Self::Architecture(archs) => archs.iter().map(Architecture::as_str).find(|n| !parse::is_ident(n)),
      Self::Configuration(_) => None,
      Self::Feature(name) => (!parse::is_ident(name)).then_some(name.as_str()),
      Self::Not(inner) => inner.unwritable_identifier(),
      Self::All(items) | Self::Any(items) => items.iter().find_map(Predicate::unwritable_identifier),
    }
  }

  /// Binding strength used when printing: `||` < `&&` < everything else.
  fn precedence(&self) -> u8 {
    match self {
      Self::Any(items) if items.len() > 1 => 1,
      Self::All(items) if items.len() > 1 => 2,
      _ => 3,
    }
  }

  fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
    if self.precedence() < min_precedence {
      write!(f, "({})", self)
    } else {
      write!(f, "{}", self)
    }
  }
}

/// Evaluate `predicate` against `env`.
pub fn evaluate(predicate: &Predicate, env: &Environment) -> bool {
  predicate.evaluate(env)
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, items: &[T]) -> fmt::Result {
  // Membership in an empty list never holds.
  if items.is_empty() {
    return write!(f, "false");
  }
  write!(f, "{}(", name)?;
  for (i, item) in items.iter().enumerate() {
    if i > 0 {
      write!(f, ", ")?;
    }
    write!(f, "{}", item)?;
  }
  write!(f, ")")
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Predicate], op: &str, min_precedence: u8) -> fmt::Result {
  for (i, item) in items.iter().enumerate() {
    if i > 0 {
      write!(f, " {} ", op)?;
    }
    item.fmt_operand(f, min_precedence)?;
  }
  Ok(())
}

impl fmt::Display for Predicate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Const(value) => write!(f, "{}", value),
      Self::Platform(platforms) => write_list(f, "platform", platforms),
      Self::Architecture(archs) => write_list(f, "arch", archs),
      Self::Configuration(configs) => write_list(f, "config", configs),
      Self::Feature(name) => write!(f, "feature({})", name),
      Self::Not(inner) => {
        write!(f, "!")?;
        inner.fmt_operand(f, 3)
      }
      Self::All(items) if items.is_empty() => write!(f, "true"),
      Self::Any(items) if items.is_empty() => write!(f, "false"),
      // Nested conjunctions are parenthesized so the printed form re-parses to
      // the same tree shape.
      Self::All(items) => write_joined(f, items, "&&", 3),
      Self::Any(items) => write_joined(f, items, "||", 2),
    }
  }
}

impl std::str::FromStr for Predicate {
  type Err = PredicateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    parse(s)
  }
}

impl TryFrom<String> for Predicate {
  type Error = PredicateError;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    parse(&s)
  }
}

impl Serialize for Predicate {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    if let Some(name) = self.unwritable_identifier() {
      return Err(serde::ser::Error::custom(format!(
        "identifier '{}' cannot be written in predicate text",
        name
      )));
    }
    serializer.collect_str(self)
  }
}
