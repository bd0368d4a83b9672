//! # credens-vc — Verifiable Credential Data Model
//!
//! The credential envelope and its cryptographic proof:
//!
//! - **Credential** (`credential.rs`): a W3C-shaped credential with a
//!   rigid envelope and an extensible `credentialSubject`. The signing
//!   input is always the JCS-canonical bytes of the credential with the
//!   `proof` member removed.
//! - **Proof** (`proof.rs`): an Ed25519Signature2020 proof object.
//! - **proof attachment / verification** (`engine.rs`): attaching a proof
//!   through a [`KeyStore`](credens_crypto::KeyStore) and checking a
//!   signed credential against a set of issuer verification methods.
//!
//! ## Security Invariants
//!
//! - Signing input is computed via `CanonicalBytes`, never raw
//!   `serde_json::to_vec()`; the digest type system enforces this.
//! - A credential carries at most one proof; attaching a proof to an
//!   already-signed credential is an error, not a silent replacement.

pub mod credential;
pub mod engine;
pub mod proof;

pub use credential::{Credential, CredentialError, SchemaReference, BASE_CONTEXT, BASE_TYPE};
pub use engine::{attach_proof, verify_proof, ProofError, VerificationMethod};
pub use proof::{Proof, ProofPurpose, ProofType};
