//! # Key Store Abstraction
//!
//! Abstracts Ed25519 key storage and signing behind a trait so the
//! issuance pipeline never holds private key material directly. Backends
//! for cloud KMS/HSM services implement this trait outside the workspace;
//! [`InMemoryKeyStore`] is the bundled software provider for development
//! and tests.
//!
//! Signing and key lookup are the suspension points of the issuance
//! pipeline, so the trait is async; remote backends perform I/O here and
//! callers wrap invocations in their own timeouts.
//!
//! ## Security Invariants
//!
//! - Signing input is `&ContentDigest` (never raw bytes).
//! - "Key not found" and "signing operation failed" are distinct errors:
//!   the former means the caller named a key that does not exist (fix the
//!   request), the latter that a backend operation failed.
//! - Implementations must be `Send + Sync` for use across async tasks.

use async_trait::async_trait;
use credens_core::ContentDigest;
use dashmap::DashMap;
use thiserror::Error;

use crate::ed25519::{Ed25519Signature, SigningKey, VerifyingKey};

/// Errors from key-management operations.
#[derive(Error, Debug)]
pub enum KeyStoreError {
    /// No key exists under the given identifier.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The backend failed to perform the signing operation.
    #[error("signing operation failed: {0}")]
    SigningFailed(String),
}

/// Trait for Ed25519 key storage and signing backends.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Sign a content digest with the named key.
    async fn sign(
        &self,
        key_id: &str,
        digest: &ContentDigest,
    ) -> Result<Ed25519Signature, KeyStoreError>;

    /// Return the public key for the named key.
    async fn public_key(&self, key_id: &str) -> Result<VerifyingKey, KeyStoreError>;
}

/// In-memory key store holding named Ed25519 keys.
///
/// Key material lives in process memory and is zeroized on drop by the
/// underlying dalek keys.
#[derive(Default)]
pub struct InMemoryKeyStore {
    keys: DashMap<String, SigningKey>,
}

impl InMemoryKeyStore {
    /// Create an empty key store.
    pub fn new() -> Self {
        Self {
            keys: DashMap::new(),
        }
    }

    /// Insert an existing signing key under the given identifier.
    pub fn insert(&self, key_id: impl Into<String>, key: SigningKey) {
        self.keys.insert(key_id.into(), key);
    }

    /// Generate a fresh key under the given identifier, returning its
    /// public key.
    pub fn generate(&self, key_id: impl Into<String>) -> VerifyingKey {
        let key = SigningKey::generate();
        let vk = key.verifying_key();
        self.keys.insert(key_id.into(), key);
        vk
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for InMemoryKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InMemoryKeyStore({} keys)", self.keys.len())
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn sign(
        &self,
        key_id: &str,
        digest: &ContentDigest,
    ) -> Result<Ed25519Signature, KeyStoreError> {
        let key = self
            .keys
            .get(key_id)
            .ok_or_else(|| KeyStoreError::KeyNotFound(key_id.to_string()))?;
        Ok(key.sign(digest))
    }

    async fn public_key(&self, key_id: &str) -> Result<VerifyingKey, KeyStoreError> {
        let key = self
            .keys
            .get(key_id)
            .ok_or_else(|| KeyStoreError::KeyNotFound(key_id.to_string()))?;
        Ok(key.verifying_key())
    }
}
