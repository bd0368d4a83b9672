//! # Issuance Pipeline
//!
//! Turns an [`IssuanceRequest`] into a signed [`Credential`]: fill in
//! defaults (fresh `urn:uuid:` id, issuance date of now, the base type
//! marker and context), validate what the request declares, then
//! canonicalize, digest, and sign through the key store.
//!
//! An `IssuanceRequest` has no proof field, so "re-issue this signed
//! credential" is unrepresentable; the request is claims-only by
//! construction.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use credens_core::Timestamp;
use credens_crypto::KeyStore;
use credens_status::StatusListEntry;
use credens_vc::{attach_proof, Credential, ProofError, SchemaReference, BASE_CONTEXT, BASE_TYPE};

/// Errors from the issuance pipeline.
#[derive(Error, Debug)]
pub enum IssueError {
    /// The declared expiration does not fall after the issuance date.
    #[error("expiration {expiration} is not after issuance {issuance}")]
    ExpirationNotAfterIssuance {
        /// The effective issuance instant.
        issuance: Timestamp,
        /// The requested expiration instant.
        expiration: Timestamp,
    },

    /// The issuer identifier is empty.
    #[error("issuer must be non-empty")]
    EmptyIssuer,

    /// The subject claims are not a JSON object.
    #[error("subject must be a JSON object")]
    SubjectNotObject,

    /// The subject claims have no `"id"` member.
    #[error("subject must declare an \"id\"")]
    MissingSubjectId,

    /// Canonicalization or signing failed.
    #[error(transparent)]
    Proof(#[from] ProofError),
}

/// Everything an issuer supplies to mint a credential.
///
/// Carries no proof and no way to attach one; signing happens only
/// inside [`IssuanceEngine::issue`].
#[derive(Debug, Clone)]
pub struct IssuanceRequest {
    /// Credential id. `None` means a fresh `urn:uuid:` is minted.
    pub id: Option<String>,

    /// Extra type markers beyond the base marker, e.g.
    /// `"UniversityDegreeCredential"`.
    pub types: Vec<String>,

    /// Identifier of the issuing party.
    pub issuer: String,

    /// The claims being made. Must be a JSON object.
    pub subject: serde_json::Value,

    /// Issuance instant. `None` means now.
    pub issuance_date: Option<Timestamp>,

    /// Optional expiration; must fall after the issuance date.
    pub expiration_date: Option<Timestamp>,

    /// Status list slot assigned to this credential, if revocable.
    pub status: Option<StatusListEntry>,

    /// Schema the subject claims conform to, if declared.
    pub schema: Option<SchemaReference>,
}

impl IssuanceRequest {
    /// A minimal request: issuer plus subject claims, defaults elsewhere.
    pub fn new(issuer: impl Into<String>, subject: serde_json::Value) -> Self {
        Self {
            id: None,
            types: Vec::new(),
            issuer: issuer.into(),
            subject,
            issuance_date: None,
            expiration_date: None,
            status: None,
            schema: None,
        }
    }
}

/// The credential issuance engine.
pub struct IssuanceEngine {
    keys: Arc<dyn KeyStore>,
}

impl IssuanceEngine {
    /// Build an engine over the given key store.
    pub fn new(keys: Arc<dyn KeyStore>) -> Self {
        Self { keys }
    }

    /// Mint and sign a credential from a request.
    ///
    /// `key_id` names the signing key in the store; `verification_method`
    /// is the identifier written into the proof, which must be the
    /// published counterpart of that key.
    pub async fn issue(
        &self,
        request: IssuanceRequest,
        key_id: &str,
        verification_method: &str,
    ) -> Result<Credential, IssueError> {
        if request.issuer.is_empty() {
            return Err(IssueError::EmptyIssuer);
        }
        if !request.subject.is_object() {
            return Err(IssueError::SubjectNotObject);
        }
        if request.subject.get("id").and_then(|v| v.as_str()).is_none() {
            return Err(IssueError::MissingSubjectId);
        }

        let issuance_date = request.issuance_date.unwrap_or_else(Timestamp::now);
        if let Some(expiration) = request.expiration_date {
            if expiration <= issuance_date {
                return Err(IssueError::ExpirationNotAfterIssuance {
                    issuance: issuance_date,
                    expiration,
                });
            }
        }

        let id = request
            .id
            .unwrap_or_else(|| format!("urn:uuid:{}", Uuid::new_v4()));

        let mut types = Vec::with_capacity(request.types.len() + 1);
        types.push(BASE_TYPE.to_string());
        types.extend(
            request
                .types
                .into_iter()
                .filter(|t| t != BASE_TYPE),
        );

        let credential = Credential {
            context: vec![BASE_CONTEXT.to_string()],
            id: Some(id.clone()),
            types,
            issuer: request.issuer.clone(),
            issuance_date,
            expiration_date: request.expiration_date,
            credential_subject: request.subject,
            credential_status: request.status,
            credential_schema: request.schema,
            proof: None,
        };

        let signed = attach_proof(credential, self.keys.as_ref(), key_id, verification_method)
            .await?;
        info!(credential_id = %id, issuer = %request.issuer, key_id, "credential issued");
        Ok(signed)
    }
}

impl std::fmt::Debug for IssuanceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("IssuanceEngine")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credens_crypto::{InMemoryKeyStore, KeyStoreError};
    use credens_vc::verify_proof;
    use credens_vc::VerificationMethod;
    use serde_json::json;

    fn engine() -> (IssuanceEngine, Arc<InMemoryKeyStore>) {
        let keys = Arc::new(InMemoryKeyStore::new());
        (IssuanceEngine::new(keys.clone()), keys)
    }

    #[tokio::test]
    async fn minimal_request_produces_verifiable_credential() {
        let (engine, keys) = engine();
        let vk = keys.generate("k1");

        let request = IssuanceRequest::new(
            "did:example:issuer",
            json!({"id": "did:example:alice", "member": true}),
        );
        let cred = engine
            .issue(request, "k1", "did:example:issuer#key-1")
            .await
            .unwrap();

        assert!(cred.is_signed());
        assert!(cred.has_base_type());
        assert!(cred.id.as_deref().unwrap().starts_with("urn:uuid:"));
        cred.check_structure().unwrap();

        let methods = [VerificationMethod::assertion("did:example:issuer#key-1", vk)];
        verify_proof(&cred, &methods, None).unwrap();
    }

    #[tokio::test]
    async fn base_type_comes_first_and_is_not_duplicated() {
        let (engine, keys) = engine();
        keys.generate("k1");

        let mut request = IssuanceRequest::new("did:example:issuer", json!({"id": "did:example:alice", "a": 1}));
        request.types = vec![
            "UniversityDegreeCredential".to_string(),
            "VerifiableCredential".to_string(),
        ];
        let cred = engine
            .issue(request, "k1", "did:example:issuer#key-1")
            .await
            .unwrap();

        assert_eq!(
            cred.types,
            vec!["VerifiableCredential", "UniversityDegreeCredential"]
        );
    }

    #[tokio::test]
    async fn explicit_id_and_dates_are_preserved() {
        let (engine, keys) = engine();
        keys.generate("k1");

        let issued_at = Timestamp::from_epoch_secs(1_700_000_000).unwrap();
        let expires_at = Timestamp::from_epoch_secs(1_800_000_000).unwrap();
        let mut request = IssuanceRequest::new("did:example:issuer", json!({"id": "did:example:alice", "a": 1}));
        request.id = Some("urn:example:cred-7".to_string());
        request.issuance_date = Some(issued_at);
        request.expiration_date = Some(expires_at);

        let cred = engine
            .issue(request, "k1", "did:example:issuer#key-1")
            .await
            .unwrap();
        assert_eq!(cred.id.as_deref(), Some("urn:example:cred-7"));
        assert_eq!(cred.issuance_date, issued_at);
        assert_eq!(cred.expiration_date, Some(expires_at));
    }

    #[tokio::test]
    async fn expiration_before_issuance_is_rejected() {
        let (engine, keys) = engine();
        keys.generate("k1");

        let mut request = IssuanceRequest::new("did:example:issuer", json!({"id": "did:example:alice", "a": 1}));
        request.issuance_date = Some(Timestamp::from_epoch_secs(1_700_000_000).unwrap());
        request.expiration_date = Some(Timestamp::from_epoch_secs(1_600_000_000).unwrap());

        let err = engine
            .issue(request, "k1", "did:example:issuer#key-1")
            .await
            .unwrap_err();
        assert!(matches!(err, IssueError::ExpirationNotAfterIssuance { .. }));
    }

    #[tokio::test]
    async fn non_object_subject_is_rejected_before_signing() {
        let (engine, keys) = engine();
        keys.generate("k1");

        let request = IssuanceRequest::new("did:example:issuer", json!(["not", "an", "object"]));
        let err = engine
            .issue(request, "k1", "did:example:issuer#key-1")
            .await
            .unwrap_err();
        assert!(matches!(err, IssueError::SubjectNotObject));
    }

    #[tokio::test]
    async fn subject_without_id_is_rejected() {
        let (engine, keys) = engine();
        keys.generate("k1");

        let request = IssuanceRequest::new("did:example:issuer", json!({"name": "Alice"}));
        let err = engine
            .issue(request, "k1", "did:example:issuer#key-1")
            .await
            .unwrap_err();
        assert!(matches!(err, IssueError::MissingSubjectId));
    }

    #[tokio::test]
    async fn empty_issuer_is_rejected() {
        let (engine, _keys) = engine();
        let request = IssuanceRequest::new("", json!({"id": "did:example:alice", "a": 1}));
        let err = engine.issue(request, "k1", "vm").await.unwrap_err();
        assert!(matches!(err, IssueError::EmptyIssuer));
    }

    #[tokio::test]
    async fn unknown_signing_key_surfaces_as_proof_error() {
        let (engine, _keys) = engine();
        let request = IssuanceRequest::new("did:example:issuer", json!({"id": "did:example:alice", "a": 1}));
        let err = engine.issue(request, "missing", "vm").await.unwrap_err();
        assert!(matches!(
            err,
            IssueError::Proof(ProofError::KeyStore(KeyStoreError::KeyNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn minted_ids_are_unique() {
        let (engine, keys) = engine();
        keys.generate("k1");

        let a = engine
            .issue(
                IssuanceRequest::new("did:example:issuer", json!({"id": "did:example:alice", "n": 1})),
                "k1",
                "vm",
            )
            .await
            .unwrap();
        let b = engine
            .issue(
                IssuanceRequest::new("did:example:issuer", json!({"id": "did:example:alice", "n": 1})),
                "k1",
                "vm",
            )
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn status_and_schema_references_are_carried() {
        use credens_status::StatusPurpose;

        let (engine, keys) = engine();
        keys.generate("k1");

        let mut request = IssuanceRequest::new("did:example:issuer", json!({"id": "did:example:alice", "a": 1}));
        request.status = Some(StatusListEntry::new("list-1", 9, StatusPurpose::Revocation));
        request.schema = Some(SchemaReference::json_schema("https://schemas.example/a.json"));

        let cred = engine.issue(request, "k1", "vm").await.unwrap();
        assert_eq!(cred.credential_status.as_ref().unwrap().index, 9);
        assert!(cred.credential_schema.is_some());
    }
}
