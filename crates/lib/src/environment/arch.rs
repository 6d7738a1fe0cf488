use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// CPU architecture variants a target can be built for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Architecture {
  X86,
  X86_64,
  Arm32,
  Arm64,
  Other(String),
}

impl Architecture {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::X86),
      "x86_64" => Some(Self::X86_64),
      "arm" => Some(Self::Arm32),
      "aarch64" => Some(Self::Arm64),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &str {
    match self {
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
      Self::Arm32 => "arm32",
      Self::Arm64 => "arm64",
      Self::Other(name) => name,
    }
  }

  pub fn matches(&self, other: &Architecture) -> bool {
    match (self, other) {
      (Self::Other(a), Self::Other(b)) => a.eq_ignore_ascii_case(b),
      _ => self == other,
    }
  }
}

impl FromStr for Architecture {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let arch = match s.trim().to_ascii_lowercase().as_str() {
      "x86" | "i386" | "i686" => Self::X86,
      "x86_64" | "x64" | "amd64" => Self::X86_64,
      "arm" | "arm32" | "armv7" => Self::Arm32,
      "arm64" | "aarch64" => Self::Arm64,
      _ => Self::Other(s.trim().to_string()),
    };
    Ok(arch)
  }
}

impl From<String> for Architecture {
  fn from(s: String) -> Self {
    match s.parse() {
      Ok(arch) => arch,
      Err(never) => match never {},
    }
  }
}

impl From<Architecture> for String {
  fn from(arch: Architecture) -> Self {
    arch.as_str().to_string()
  }
}

impl fmt::Display for Architecture {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
