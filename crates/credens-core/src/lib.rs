//! # credens-core — Foundational Types for Credens
//!
//! This crate is the bedrock of the Credens stack. It defines the
//! type-system primitives the issuance and verification engines build on,
//! and it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    canonicalization. No raw `serde_json::to_vec()` for digests, ever.
//!    Two semantically identical documents always canonicalize to
//!    byte-identical output, which is the cross-implementation signature
//!    compatibility contract.
//!
//! 2. **`sha256_digest()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that every fingerprint in the system was computed over
//!    canonical bytes.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, so timestamps serialize to a single
//!    canonical form.
//!
//! 4. **No ambient state.** The digest cache is an explicitly constructed
//!    value that callers inject and share; there are no process-wide
//!    singletons in this crate or anywhere above it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credens-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod cache;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use cache::DigestCache;
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, FingerprintError, TimestampError};
pub use temporal::Timestamp;
