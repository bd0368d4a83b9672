//! # Digest Cache — Content-Addressed Memoization
//!
//! A concurrent fingerprint cache keyed by canonical bytes. Because
//! canonicalization is deterministic, the canonical byte sequence is a
//! complete cache key: repeated digesting of identical canonical content
//! is O(1) after the first computation.
//!
//! The cache is an explicitly constructed value that callers inject into
//! the engines and share via `Arc` — there is no process-wide cache.
//! Disabling the cache clears it immediately, for memory-constrained
//! operation. Get/put are safe for concurrent use without a coarse global
//! lock (sharded map), which matters for batch verification workloads.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};

/// Concurrent digest cache keyed by canonical bytes.
#[derive(Debug, Default)]
pub struct DigestCache {
    entries: DashMap<CanonicalBytes, ContentDigest>,
    enabled: AtomicBool,
}

impl DigestCache {
    /// Create an empty, enabled cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            enabled: AtomicBool::new(true),
        }
    }

    /// Compute (or look up) the digest of canonical bytes.
    ///
    /// When the cache is enabled, the first call for a given canonical
    /// byte sequence computes and stores the digest; later calls return
    /// the stored value. When disabled, this is a plain computation with
    /// no storage.
    pub fn digest(&self, canonical: &CanonicalBytes) -> ContentDigest {
        if !self.enabled.load(Ordering::Acquire) {
            return sha256_digest(canonical);
        }
        if let Some(hit) = self.entries.get(canonical) {
            return hit.clone();
        }
        let computed = sha256_digest(canonical);
        self.entries
            .insert(canonical.clone(), computed.clone());
        computed
    }

    /// Re-enable caching after a [`disable`](Self::disable).
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    /// Disable caching and clear all stored entries immediately.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
        self.entries.clear();
    }

    /// Whether the cache currently stores entries.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Number of cached fingerprints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no fingerprints are cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
