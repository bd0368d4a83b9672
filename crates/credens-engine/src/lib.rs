//! # credens-engine — Issuance and Verification Pipelines
//!
//! The top of the Credens stack. Two engines:
//!
//! - [`IssuanceEngine`](issue::IssuanceEngine) turns an issuance request
//!   into a signed credential: fill defaults, validate temporal fields,
//!   canonicalize, digest, sign through a [`KeyStore`](credens_crypto::KeyStore).
//! - [`VerificationEngine`](verify::VerificationEngine) runs a signed
//!   credential through a fixed stage order — structure, proof form,
//!   issuer resolution, signature, temporal window, revocation status,
//!   optional schema, optional trust — and returns a three-valued
//!   [`VerificationResult`](result::VerificationResult): Valid (with
//!   warnings), Invalid (with the first failing reason), or Inconclusive
//!   (the engine could not reach a verdict).
//!
//! Invalid means the credential failed a check; Inconclusive means the
//! infrastructure failed the engine. Callers that treat the two alike
//! will punish credential holders for network weather.
//!
//! External capabilities (issuer resolution, status list storage, schema
//! validation, trust policy) are injected as trait objects; in-memory
//! providers for all of them live in [`providers`].

pub mod capabilities;
pub mod issue;
pub mod options;
pub mod providers;
pub mod result;
pub mod verify;

pub use capabilities::{
    IssuerResolver, ResolveError, ResolvedIssuer, SchemaCheck, SchemaValidator, StatusListStore,
    StatusStoreError, TrustPolicy,
};
pub use issue::{IssuanceEngine, IssuanceRequest, IssueError};
pub use options::{RevocationFailurePolicy, VerificationOptions};
pub use providers::{AllowListTrustPolicy, JsonSchemaValidator, StaticResolver};
pub use result::{InconclusiveCause, InvalidReason, VerificationResult, VerificationWarning};
pub use verify::VerificationEngine;
