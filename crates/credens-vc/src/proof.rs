//! Proof object attached to a signed credential. One proof per
//! credential; the proof value is the hex-encoded Ed25519 signature over
//! the credential's canonical signing input digest.

use credens_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Supported proof suite identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    /// Ed25519 over the SHA-256 digest of the JCS-canonical body.
    Ed25519Signature2020,
}

impl ProofType {
    /// The suite identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519Signature2020 => "Ed25519Signature2020",
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The relationship the proof asserts between issuer and credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The issuer asserts the claims in the credential.
    AssertionMethod,
    /// The key authenticates the controller, not the claims.
    Authentication,
}

/// A cryptographic proof over a credential body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Proof suite identifier.
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    /// When the proof was created.
    pub created: Timestamp,

    /// Identifier of the issuer verification method that produced the
    /// signature, e.g. `did:example:issuer#key-1`.
    pub verification_method: String,

    /// Why the proof exists. Credential proofs use `assertionMethod`.
    pub proof_purpose: ProofPurpose,

    /// Hex-encoded 64-byte Ed25519 signature.
    pub proof_value: String,
}

impl Proof {
    /// Build an assertion-method Ed25519 proof.
    pub fn new_ed25519(
        verification_method: impl Into<String>,
        proof_value: impl Into<String>,
        created: Timestamp,
    ) -> Self {
        Self {
            proof_type: ProofType::Ed25519Signature2020,
            created,
            verification_method: verification_method.into(),
            proof_purpose: ProofPurpose::AssertionMethod,
            proof_value: proof_value.into(),
        }
    }
}
