//! Content hashing and deterministic seed derivation

use crate::types::{AssetFamily, Dimensions};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A SHA-256 based content hash.
///
/// Recorded on every registry entry so a stored payload can be audited
/// against the bytes the generator produced.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute a hash from bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();
        Self(result.into())
    }

    /// Compute a hash from a string
    pub fn from_str(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }

    /// Get the hash as a hex string
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Get the hash as a prefixed hex string (e.g., "sha256:abcdef...")
    pub fn to_prefixed_hex(&self) -> String {
        format!("sha256:{}", self.to_hex())
    }

    /// First four bytes as a big-endian integer
    pub fn truncate_u32(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Derive the 32-bit generation seed for a request.
///
/// Hashes family, category, description and declared dimensions, one per
/// line, so identical requests always land on the same seed.
pub fn derive_seed(
    family: AssetFamily,
    category: Option<&str>,
    description: &str,
    dimensions: Option<Dimensions>,
) -> u32 {
    let dims = dimensions.map(|d| d.to_string()).unwrap_or_default();
    let material = format!(
        "{}\n{}\n{}\n{}",
        family.as_str(),
        category.unwrap_or(""),
        description,
        dims
    );
    ContentHash::from_str(&material).truncate_u32()
}
