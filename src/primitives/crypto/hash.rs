//! Hash function selection.
//!
//! The signature digest, the key-derivation function and the ciphertext tag all go
//! through [`HashAlgorithm`], so swapping the digest changes every derived value
//! consistently.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use sha3::Sha3_256;

/// Hash algorithms usable as the scheme's digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256 (32-byte digest).
    #[default]
    #[serde(rename = "sha256")]
    Sha256,

    /// SHA-512 (64-byte digest).
    #[serde(rename = "sha512")]
    Sha512,

    /// SHA3-256 (32-byte digest).
    #[serde(rename = "sha3-256")]
    Sha3_256,
}

impl HashAlgorithm {
    /// Returns the size of the digest in bytes.
    pub fn output_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
            HashAlgorithm::Sha3_256 => 32,
        }
    }

    /// Returns the name of the hash algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha3_256 => "sha3-256",
        }
    }

    /// Hashes the concatenation of `parts`.
    pub fn digest(&self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => digest_parts::<Sha256>(parts),
            HashAlgorithm::Sha512 => digest_parts::<Sha512>(parts),
            HashAlgorithm::Sha3_256 => digest_parts::<Sha3_256>(parts),
        }
    }
}

fn digest_parts<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error type for hash algorithm parsing.
#[derive(Debug, thiserror::Error)]
#[error("Unknown hash algorithm: {0}")]
pub struct UnknownHashAlgorithm(String);

impl FromStr for HashAlgorithm {
    type Err = UnknownHashAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(HashAlgorithm::Sha512),
            "sha3-256" | "sha3_256" => Ok(HashAlgorithm::Sha3_256),
            _ => Err(UnknownHashAlgorithm(s.to_string())),
        }
    }
}
