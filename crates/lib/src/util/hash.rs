//! Content hashing for generated artifacts.
//!
//! - `ObjectHash`: a truncated 20-character hash identifying a serialized value
//! - `Hashable`: blanket helper for any `Serialize` type

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::OBJ_HASH_PREFIX_LEN;

pub type HashError = serde_json::Error;

/// A content-addressed hash identifying a serialized value.
///
/// The hash is a 20-character truncated SHA-256 of the JSON serialization,
/// as lowercase hex (e.g. `"a1b2c3d4e5f6789012ab"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHash(pub String);

impl fmt::Display for ObjectHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Hash of a value's JSON form. Field order is fixed by the type, so equal
/// values hash equally.
pub trait Hashable: Serialize {
  fn compute_hash(&self) -> Result<ObjectHash, HashError> {
    let digest = Sha256::digest(serde_json::to_vec(self)?);
    let mut hex = format!("{:x}", digest);
    hex.truncate(OBJ_HASH_PREFIX_LEN);
    Ok(ObjectHash(hex))
  }
}
