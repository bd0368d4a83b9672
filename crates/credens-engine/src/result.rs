//! # Verification Verdicts
//!
//! The three-valued outcome of running a credential through the
//! verification pipeline, plus the closed taxonomy of failure reasons.
//! Stages run in a fixed order and the first failure wins, so two
//! verifiers given the same inputs report the same reason.

use serde::{Deserialize, Serialize};

/// Why a credential failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InvalidReason {
    /// The document is not a well-formed credential.
    StructurallyInvalid {
        /// What was malformed.
        detail: String,
    },

    /// The proof is missing, malformed, or the signature does not verify.
    ProofInvalid {
        /// What failed.
        detail: String,
    },

    /// The issuer does not exist in the resolver's view of the world.
    IssuerUnresolvable {
        /// The unresolvable issuer identifier.
        issuer: String,
    },

    /// The credential is outside its validity window.
    Expired {
        /// Which bound was violated and when.
        detail: String,
    },

    /// The credential's revocation bit is set.
    Revoked,

    /// The credential's suspension bit is set.
    Suspended,

    /// The subject claims do not conform to the referenced schema.
    SchemaInvalid {
        /// The schema violations.
        errors: Vec<String>,
    },

    /// The issuer resolved and signed correctly but is not trusted here.
    UntrustedIssuer {
        /// The untrusted issuer identifier.
        issuer: String,
    },
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StructurallyInvalid { detail } => write!(f, "structurally invalid: {detail}"),
            Self::ProofInvalid { detail } => write!(f, "proof invalid: {detail}"),
            Self::IssuerUnresolvable { issuer } => write!(f, "issuer unresolvable: {issuer}"),
            Self::Expired { detail } => write!(f, "outside validity window: {detail}"),
            Self::Revoked => f.write_str("revoked"),
            Self::Suspended => f.write_str("suspended"),
            Self::SchemaInvalid { errors } => {
                write!(f, "schema invalid: {}", errors.join("; "))
            }
            Self::UntrustedIssuer { issuer } => write!(f, "untrusted issuer: {issuer}"),
        }
    }
}

/// Why the engine could not reach a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum InconclusiveCause {
    /// An external call exceeded the configured timeout.
    Cancelled,

    /// An external dependency was unreachable.
    TransientUnavailable {
        /// Which dependency and how it failed.
        detail: String,
    },
}

impl std::fmt::Display for InconclusiveCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled: external call timed out"),
            Self::TransientUnavailable { detail } => {
                write!(f, "transient unavailability: {detail}")
            }
        }
    }
}

/// A non-fatal condition noted on an otherwise Valid verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum VerificationWarning {
    /// The status list could not be fetched and the degrade policy
    /// accepted the credential without a revocation check.
    StatusListUnreachable {
        /// The list that could not be fetched.
        list_id: String,
        /// How the fetch failed.
        detail: String,
    },
}

/// The outcome of verifying one credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationResult {
    /// Every stage passed. Warnings carry degraded-mode caveats.
    Valid {
        /// Non-fatal conditions observed during verification.
        warnings: Vec<VerificationWarning>,
    },

    /// A stage failed; `reason` is the first failure in stage order.
    Invalid {
        /// Why the credential was rejected.
        reason: InvalidReason,
    },

    /// The engine could not complete verification.
    Inconclusive {
        /// Why no verdict was reached.
        cause: InconclusiveCause,
    },
}

impl VerificationResult {
    /// A clean pass.
    pub fn valid() -> Self {
        Self::Valid {
            warnings: Vec::new(),
        }
    }

    /// A rejection for the given reason.
    pub fn invalid(reason: InvalidReason) -> Self {
        Self::Invalid { reason }
    }

    /// A non-verdict for the given cause.
    pub fn inconclusive(cause: InconclusiveCause) -> Self {
        Self::Inconclusive { cause }
    }

    /// Whether this is a Valid verdict (possibly with warnings).
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}
