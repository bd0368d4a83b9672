//! # credens-crypto — Cryptographic Primitives for Credens
//!
//! This crate provides the cryptographic building blocks for credential
//! proofs:
//!
//! - **Ed25519** signing and verification (`ed25519.rs`), operating on
//!   [`ContentDigest`](credens_core::ContentDigest) values so that only
//!   canonicalized-then-digested content can ever be signed.
//! - **Key management boundary** (`keystore.rs`): the [`KeyStore`] trait
//!   is the capability the issuance pipeline consumes. Backends that talk
//!   to cloud HSMs or hardware tokens live behind this trait and outside
//!   this workspace; [`InMemoryKeyStore`] is the bundled software
//!   provider for development and tests.
//!
//! ## Security Invariants
//!
//! - Signing input is `&ContentDigest` — you cannot sign raw bytes.
//! - Private keys are never serialized or logged. `SigningKey` does not
//!   implement `Serialize`, and its `Debug` output is redacted. Key
//!   material is zeroized on drop (ed25519-dalek `zeroize` feature).
//! - Public keys and signatures serialize as hex strings.

pub mod ed25519;
pub mod error;
pub mod keystore;

pub use ed25519::{verify, Ed25519Signature, SigningKey, VerifyingKey};
pub use error::CryptoError;
pub use keystore::{InMemoryKeyStore, KeyStore, KeyStoreError};
