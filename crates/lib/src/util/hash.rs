//! Fingerprints for serialized plans.
//!
//! A fingerprint is a SHA-256 of the value's JSON form, truncated to
//! [`PLAN_HASH_PREFIX_LEN`] lowercase hex characters. Maps inside plans are
//! `BTreeMap`s, so equal values always serialize, and hash, the same way.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::PLAN_HASH_PREFIX_LEN;

pub type HashError = serde_json::Error;

/// A truncated content hash, e.g. `"a1b2c3d4e5f6789012ab"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanHash(pub String);

impl std::fmt::Display for PlanHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  fn compute_hash(&self) -> Result<PlanHash, HashError> {
    let serialized = serde_json::to_string(self)?;
    Ok(PlanHash(hash_bytes(serialized.as_bytes())[..PLAN_HASH_PREFIX_LEN].to_string()))
  }
}

/// Full 64-character SHA-256 hex digest of `data`.
pub fn hash_bytes(data: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(data);
  format!("{:x}", hasher.finalize())
}
