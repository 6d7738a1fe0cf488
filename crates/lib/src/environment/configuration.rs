use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Build configuration (optimization and checking level).
///
/// Parsed case-insensitively, like every other place a configuration name is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Configuration {
  Debug,
  DebugGame,
  #[default]
  Development,
  Test,
  Shipping,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown configuration '{0}' (expected Debug, DebugGame, Development, Test or Shipping)")]
pub struct UnknownConfiguration(pub String);

impl Configuration {
  pub fn all() -> [Configuration; 5] {
    [
      Self::Debug,
      Self::DebugGame,
      Self::Development,
      Self::Test,
      Self::Shipping,
    ]
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::DebugGame => "DebugGame",
      Self::Development => "Development",
      Self::Test => "Test",
      Self::Shipping => "Shipping",
    }
  }
}

impl FromStr for Configuration {
  type Err = UnknownConfiguration;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::all()
      .into_iter()
      .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| UnknownConfiguration(s.trim().to_string()))
  }
}

impl TryFrom<String> for Configuration {
  type Error = UnknownConfiguration;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    s.parse()
  }
}

impl From<Configuration> for String {
  fn from(configuration: Configuration) -> Self {
    configuration.as_str().to_string()
  }
}

impl fmt::Display for Configuration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
