//! # Content Digest — Fingerprints for Integrity and Addressing
//!
//! Defines `ContentDigest` and `DigestAlgorithm`. A digest is the SHA-256
//! hash of canonical bytes plus an algorithm tag, rendered either as
//! `sha256:<hex>` for diagnostics or as a multibase-style fingerprint
//! (`'z'` + base58btc) for use as a compact, URL-safe content token.
//!
//! ## Security Invariant
//!
//! `ContentDigest` can only be computed from `CanonicalBytes`, ensuring
//! that all digests in the system are produced through the correct
//! canonicalization pipeline. This is enforced by the signature of
//! [`sha256_digest()`].
//!
//! Digest equality is constant-time over the hash bytes, so comparing a
//! recomputed digest against a recorded one does not leak the position of
//! the first differing byte.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::canonical::CanonicalBytes;
use crate::error::FingerprintError;

/// Multibase prefix for base58btc, the encoding all fingerprints use.
const BASE58BTC_PREFIX: char = 'z';

/// The hash algorithm used to produce a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256 — the only algorithm currently in use. The tag exists so
    /// persisted fingerprints stay self-describing across migrations.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content digest with its algorithm tag.
///
/// Produced exclusively from `CanonicalBytes` via [`sha256_digest()`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a content digest from raw bytes and algorithm.
    ///
    /// Prefer [`sha256_digest()`] for computing digests from canonical
    /// bytes; this constructor exists for deserialization paths.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Render the digest as a multibase-style fingerprint token:
    /// a one-character encoding prefix followed by base58btc of the hash.
    ///
    /// Fingerprints are short, URL-safe, and self-describing; they serve
    /// as integrity tokens and content-addressed cache keys.
    pub fn fingerprint(&self) -> String {
        format!("{}{}", BASE58BTC_PREFIX, bs58::encode(&self.bytes).into_string())
    }

    /// Parse a fingerprint token produced by [`ContentDigest::fingerprint`].
    pub fn from_fingerprint(token: &str) -> Result<Self, FingerprintError> {
        let mut chars = token.chars();
        let prefix = chars.next().ok_or(FingerprintError::Empty)?;
        if prefix != BASE58BTC_PREFIX {
            return Err(FingerprintError::UnsupportedPrefix(prefix));
        }
        let body = chars.as_str();
        let decoded = bs58::decode(body)
            .into_vec()
            .map_err(|e| FingerprintError::InvalidEncoding(e.to_string()))?;
        if decoded.len() != 32 {
            return Err(FingerprintError::InvalidLength(decoded.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Self::new(DigestAlgorithm::Sha256, bytes))
    }
}

// Constant-time comparison over the hash bytes. The algorithm tag is
// public metadata and may be compared normally.
impl PartialEq for ContentDigest {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && bool::from(self.bytes.ct_eq(&other.bytes))
    }
}

impl Eq for ContentDigest {}

impl std::hash::Hash for ContentDigest {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.algorithm.hash(state);
        self.bytes.hash(state);
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// The function signature enforces that only `CanonicalBytes` (produced
/// through the JCS pipeline) can be hashed, preventing any code path from
/// digesting non-canonical serialization.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}
