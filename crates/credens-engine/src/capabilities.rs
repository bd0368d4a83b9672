//! # External Capabilities
//!
//! The verification pipeline touches the outside world in four places:
//! resolving an issuer's keys, fetching a status list, validating a
//! schema, and consulting a trust policy. Each is a trait object so
//! deployments plug in DID resolvers, HTTP fetchers, or registries
//! without the pipeline knowing.
//!
//! Every error surface distinguishes "the thing does not exist" from
//! "I could not reach the thing". The pipeline maps the former to an
//! Invalid verdict and the latter to Inconclusive (or a degraded Valid,
//! for status lists under the degrade policy) — collapsing them would
//! make network weather indistinguishable from revocation.

use std::sync::Arc;

use async_trait::async_trait;
use credens_status::StatusList;
use credens_vc::VerificationMethod;
use thiserror::Error;

/// Errors from issuer resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No issuer exists under the given identifier.
    #[error("issuer not found: {0}")]
    NotFound(String),

    /// The resolver backend could not be reached.
    #[error("issuer resolution unavailable: {0}")]
    Unavailable(String),
}

/// An issuer's published verification material.
#[derive(Debug, Clone)]
pub struct ResolvedIssuer {
    /// The issuer identifier as resolved.
    pub issuer: String,
    /// The verification methods the issuer declares.
    pub verification_methods: Vec<VerificationMethod>,
}

/// Resolves an issuer identifier to its published keys.
#[async_trait]
pub trait IssuerResolver: Send + Sync {
    /// Resolve the issuer's verification material.
    async fn resolve(&self, issuer: &str) -> Result<ResolvedIssuer, ResolveError>;
}

/// Errors from status list retrieval and persistence.
#[derive(Error, Debug)]
pub enum StatusStoreError {
    /// No list exists under the given identifier.
    #[error("status list not found: {0}")]
    NotFound(String),

    /// The store could not be reached.
    #[error("status list store unreachable: {0}")]
    Unreachable(String),
}

/// Loads and persists status lists by identifier.
#[async_trait]
pub trait StatusListStore: Send + Sync {
    /// Load the list a credential's status entry points at.
    async fn load(&self, list_id: &str) -> Result<Arc<StatusList>, StatusStoreError>;

    /// Persist a list under its own identifier.
    async fn persist(&self, list: &StatusList) -> Result<(), StatusStoreError>;
}

/// Outcome of validating a credential subject against a schema.
#[derive(Debug, Clone)]
pub struct SchemaCheck {
    /// Whether the subject conformed.
    pub valid: bool,
    /// Human-readable violations, empty when valid.
    pub errors: Vec<String>,
}

impl SchemaCheck {
    /// A passing check.
    pub fn pass() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// A failing check with the given violations.
    pub fn fail(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

/// Validates credential subjects against referenced schemas.
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    /// Validate `subject` against the schema registered under `schema_id`.
    ///
    /// Returns an error string only when the validator itself is
    /// unavailable (unknown schema, backend down); violations are carried
    /// inside [`SchemaCheck`].
    async fn validate(
        &self,
        schema_id: &str,
        subject: &serde_json::Value,
    ) -> Result<SchemaCheck, String>;
}

/// Decides whether an issuer is acceptable to this verifier.
#[async_trait]
pub trait TrustPolicy: Send + Sync {
    /// Whether the issuer is trusted for credentials of the given types.
    /// Errors mean the policy backend was unreachable, not that the
    /// issuer is untrusted.
    async fn is_trusted(&self, issuer: &str, types: &[String]) -> Result<bool, String>;
}
