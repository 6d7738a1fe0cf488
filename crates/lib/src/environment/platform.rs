use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::arch::Architecture;

/// Target platforms a module can be built for.
///
/// The set is closed except for `Other`, which carries any identifier that is
/// not one of the known platforms. Parsing never fails: unrecognised names land
/// in `Other` so declarations mentioning a platform we have never heard of stay
/// loadable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
  Win32,
  Win64,
  Linux,
  Mac,
  IOS,
  Android,
  Other(String),
}

impl Platform {
  /// Every known (non-`Other`) platform, in a stable order.
  pub fn known() -> Vec<Platform> {
    vec![
      Self::Win32,
      Self::Win64,
      Self::Linux,
      Self::Mac,
      Self::IOS,
      Self::Android,
    ]
  }

  /// Detect the platform of the running host
  ///
  /// Returns `None` if the host OS has no known platform identifier
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::Mac),
      "windows" if cfg!(target_pointer_width = "64") => Some(Self::Win64),
      "windows" => Some(Self::Win32),
      "ios" => Some(Self::IOS),
      "android" => Some(Self::Android),
      _ => None,
    }
  }

  /// Returns the canonical identifier for this platform
  pub fn as_str(&self) -> &str {
    match self {
      Self::Win32 => "Win32",
      Self::Win64 => "Win64",
      Self::Linux => "Linux",
      Self::Mac => "Mac",
      Self::IOS => "IOS",
      Self::Android => "Android",
      Self::Other(name) => name,
    }
  }

  pub fn is_known(&self) -> bool {
    !matches!(self, Self::Other(_))
  }

  /// The architecture a platform is built for when none is given explicitly.
  pub fn default_architecture(&self) -> Architecture {
    match self {
      Self::Win32 => Architecture::X86,
      Self::Win64 | Self::Linux => Architecture::X86_64,
      Self::Mac | Self::IOS | Self::Android => Architecture::Arm64,
      Self::Other(_) => Architecture::current().unwrap_or(Architecture::X86_64),
    }
  }

  /// Whether `other` names the same platform.
  ///
  /// `Other` identifiers compare case-insensitively and never match a known
  /// platform.
  pub fn matches(&self, other: &Platform) -> bool {
    match (self, other) {
      (Self::Other(a), Self::Other(b)) => a.eq_ignore_ascii_case(b),
      _ => self == other,
    }
  }
}

impl FromStr for Platform {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let platform = match s.trim().to_ascii_lowercase().as_str() {
      "win32" => Self::Win32,
      "win64" | "windows" => Self::Win64,
      "linux" => Self::Linux,
      "mac" | "macos" | "darwin" => Self::Mac,
      "ios" => Self::IOS,
      "android" => Self::Android,
      _ => Self::Other(s.trim().to_string()),
    };
    Ok(platform)
  }
}

impl From<String> for Platform {
  fn from(s: String) -> Self {
    match s.parse() {
      Ok(platform) => platform,
      Err(never) => match never {},
    }
  }
}

impl From<Platform> for String {
  fn from(platform: Platform) -> Self {
    platform.as_str().to_string()
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
