//! # Credential Envelope
//!
//! The W3C-shaped credential document. The envelope is rigid — unknown
//! top-level members are rejected at deserialization — while
//! `credentialSubject` stays an open JSON object per the data model.
//!
//! ## Security Invariants
//!
//! - [`Credential::signing_input`] removes the `proof` member and
//!   canonicalizes via [`CanonicalBytes`]; there is no other way to
//!   produce bytes for signing or signature checking.
//! - Structural validity (base type marker, non-empty issuer, subject
//!   shape) is checked by [`Credential::check_structure`], which the
//!   verification pipeline runs before any cryptography.

use credens_core::{CanonicalBytes, CanonicalizationError, Timestamp};
use credens_status::StatusListEntry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::proof::Proof;

/// The JSON-LD context every credential carries first.
pub const BASE_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// The type marker every credential must include.
pub const BASE_TYPE: &str = "VerifiableCredential";

/// Errors from credential construction and structural checks.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Canonicalization of the credential body failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The `type` array is missing the base marker.
    #[error("credential type must include \"{BASE_TYPE}\"")]
    MissingBaseType,

    /// The issuer identifier is empty.
    #[error("credential issuer must be non-empty")]
    EmptyIssuer,

    /// The credential subject is not a JSON object.
    #[error("credential subject must be a JSON object")]
    SubjectNotObject,

    /// The credential subject has no `"id"` member.
    #[error("credential subject must declare an \"id\"")]
    MissingSubjectId,

    /// The expiration date is not after the issuance date.
    #[error("expiration {expiration} is not after issuance {issuance}")]
    ExpirationBeforeIssuance {
        /// The declared issuance instant.
        issuance: Timestamp,
        /// The declared expiration instant.
        expiration: Timestamp,
    },
}

/// Reference to the JSON Schema a credential's subject claims conform to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaReference {
    /// Identifier of the schema document.
    pub id: String,
    /// Schema mechanism, e.g. `"JsonSchema"`.
    #[serde(rename = "type")]
    pub schema_type: String,
}

impl SchemaReference {
    /// Reference a JSON Schema by id.
    pub fn json_schema(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema_type: "JsonSchema".to_string(),
        }
    }
}

/// A verifiable credential document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credential {
    /// JSON-LD context URIs, base context first.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential identifier (URN or URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Type markers. Must include [`BASE_TYPE`].
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Identifier of the issuing party.
    pub issuer: String,

    /// When the credential becomes valid.
    #[serde(rename = "issuanceDate")]
    pub issuance_date: Timestamp,

    /// When the credential stops being valid, if ever.
    #[serde(
        rename = "expirationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<Timestamp>,

    /// The claims. An open JSON object; an `"id"` member names the
    /// subject.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: serde_json::Value,

    /// Pointer into a status list, if the credential is revocable.
    #[serde(
        rename = "credentialStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub credential_status: Option<StatusListEntry>,

    /// Schema the subject claims conform to, if declared.
    #[serde(
        rename = "credentialSchema",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub credential_schema: Option<SchemaReference>,

    /// The issuer's proof. Absent on an unsigned credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl Credential {
    /// Compute the canonical signing input: the JCS-canonical bytes of
    /// the credential with the `proof` member removed.
    pub fn signing_input(&self) -> Result<CanonicalBytes, CredentialError> {
        let mut val = serde_json::to_value(self).map_err(CanonicalizationError::from)?;
        if let Some(obj) = val.as_object_mut() {
            obj.remove("proof");
        }
        Ok(CanonicalBytes::from_value(val)?)
    }

    /// Whether a proof is attached.
    pub fn is_signed(&self) -> bool {
        self.proof.is_some()
    }

    /// The subject's `"id"` member, if the subject declares one.
    pub fn subject_id(&self) -> Option<&str> {
        self.credential_subject.get("id").and_then(|v| v.as_str())
    }

    /// Whether the base type marker is present.
    pub fn has_base_type(&self) -> bool {
        self.types.iter().any(|t| t == BASE_TYPE)
    }

    /// Structural validity: base type marker present, issuer non-empty,
    /// subject is an object with an identifier, expiration (if any)
    /// after issuance.
    ///
    /// Returns the first violation found.
    pub fn check_structure(&self) -> Result<(), CredentialError> {
        if !self.has_base_type() {
            return Err(CredentialError::MissingBaseType);
        }
        if self.issuer.is_empty() {
            return Err(CredentialError::EmptyIssuer);
        }
        if !self.credential_subject.is_object() {
            return Err(CredentialError::SubjectNotObject);
        }
        if self.subject_id().is_none() {
            return Err(CredentialError::MissingSubjectId);
        }
        if let Some(expiration) = self.expiration_date {
            if expiration <= self.issuance_date {
                return Err(CredentialError::ExpirationBeforeIssuance {
                    issuance: self.issuance_date,
                    expiration,
                });
            }
        }
        Ok(())
    }
}
