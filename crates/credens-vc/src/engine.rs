//! # Proof Attachment and Signature Checking
//!
//! The two cryptographic operations on a credential:
//!
//! - [`attach_proof`] canonicalizes the unsigned credential, digests it,
//!   asks a [`KeyStore`] to sign the digest, and attaches the resulting
//!   proof. Signing an already-signed credential is an error.
//! - [`verify_proof`] recomputes the digest of the signed credential's
//!   body (proof removed) and checks the Ed25519 signature against the
//!   issuer's declared verification methods.
//!
//! ## Security Invariants
//!
//! - The digest may come from a [`DigestCache`], but cache misses always
//!   recompute from `CanonicalBytes` — the cache can never change what
//!   gets verified, only how fast.
//! - A proof naming a verification method the issuer does not declare,
//!   or one declared for a different purpose, fails before any signature
//!   math runs.

use credens_core::{sha256_digest, DigestCache, Timestamp};
use credens_crypto::{verify, Ed25519Signature, KeyStore, KeyStoreError, VerifyingKey};
use thiserror::Error;

use crate::credential::{Credential, CredentialError};
use crate::proof::{Proof, ProofPurpose};

/// Errors from proof attachment and signature checking.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The credential already carries a proof.
    #[error("credential is already signed; re-signing is not supported")]
    AlreadySigned,

    /// The credential has no proof to check.
    #[error("credential has no proof")]
    NotSigned,

    /// The credential body could not be canonicalized.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The key store failed to sign or resolve a key.
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    /// The proof names a verification method the issuer does not declare.
    #[error("unknown verification method: {0}")]
    UnknownVerificationMethod(String),

    /// The named method exists but is declared for a different purpose.
    #[error("verification method {method} is declared for {declared:?}, proof claims {claimed:?}")]
    MethodPurposeMismatch {
        /// The verification method identifier.
        method: String,
        /// The purpose the issuer declared for it.
        declared: ProofPurpose,
        /// The purpose the proof claims.
        claimed: ProofPurpose,
    },

    /// The proof value is not a decodable Ed25519 signature.
    #[error("malformed proof value: {0}")]
    MalformedProofValue(String),

    /// The signature does not verify over the credential body.
    #[error("signature verification failed: {0}")]
    SignatureInvalid(String),
}

/// A public key an issuer declares for checking its proofs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationMethod {
    /// Method identifier, matched against `Proof::verification_method`.
    pub id: String,
    /// The purpose the issuer declares this key for.
    pub purpose: ProofPurpose,
    /// The Ed25519 public key.
    pub public_key: VerifyingKey,
}

impl VerificationMethod {
    /// Declare an assertion-method key.
    pub fn assertion(id: impl Into<String>, public_key: VerifyingKey) -> Self {
        Self {
            id: id.into(),
            purpose: ProofPurpose::AssertionMethod,
            public_key,
        }
    }
}

/// Sign an unsigned credential through the key store and return it with
/// the proof attached.
///
/// `verification_method` is the identifier written into the proof; it
/// must correspond to the public half of `key_id` as the issuer
/// publishes it.
pub async fn attach_proof(
    mut credential: Credential,
    keys: &dyn KeyStore,
    key_id: &str,
    verification_method: &str,
) -> Result<Credential, ProofError> {
    if credential.is_signed() {
        return Err(ProofError::AlreadySigned);
    }

    let canonical = credential.signing_input()?;
    let digest = sha256_digest(&canonical);
    let signature = keys.sign(key_id, &digest).await?;

    credential.proof = Some(Proof::new_ed25519(
        verification_method,
        signature.to_hex(),
        Timestamp::now(),
    ));
    Ok(credential)
}

/// Check a signed credential's proof against the issuer's declared
/// verification methods.
///
/// When a `cache` is supplied, the body digest is looked up there first;
/// misses are computed and stored.
pub fn verify_proof(
    credential: &Credential,
    methods: &[VerificationMethod],
    cache: Option<&DigestCache>,
) -> Result<(), ProofError> {
    let proof = credential.proof.as_ref().ok_or(ProofError::NotSigned)?;

    let method = methods
        .iter()
        .find(|m| m.id == proof.verification_method)
        .ok_or_else(|| ProofError::UnknownVerificationMethod(proof.verification_method.clone()))?;

    if method.purpose != proof.proof_purpose {
        return Err(ProofError::MethodPurposeMismatch {
            method: method.id.clone(),
            declared: method.purpose,
            claimed: proof.proof_purpose,
        });
    }

    let canonical = credential.signing_input()?;
    let digest = match cache {
        Some(cache) => cache.digest(&canonical),
        None => sha256_digest(&canonical),
    };

    let signature = Ed25519Signature::from_hex(&proof.proof_value)
        .map_err(|e| ProofError::MalformedProofValue(e.to_string()))?;

    verify(&digest, &signature, &method.public_key)
        .map_err(|e| ProofError::SignatureInvalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{BASE_CONTEXT, BASE_TYPE};
    use credens_crypto::InMemoryKeyStore;
    use serde_json::json;

    fn unsigned() -> Credential {
        Credential {
            context: vec![BASE_CONTEXT.to_string()],
            id: Some("urn:uuid:test-0001".to_string()),
            types: vec![BASE_TYPE.to_string(), "TestCredential".to_string()],
            issuer: "did:example:issuer".to_string(),
            issuance_date: Timestamp::from_epoch_secs(1_700_000_000).unwrap(),
            expiration_date: None,
            credential_subject: json!({"id": "did:example:alice", "level": 3}),
            credential_status: None,
            credential_schema: None,
            proof: None,
        }
    }

    #[tokio::test]
    async fn attach_and_verify_roundtrip() {
        let keys = InMemoryKeyStore::new();
        let vk = keys.generate("issuer-key");

        let signed = attach_proof(unsigned(), &keys, "issuer-key", "did:example:issuer#key-1")
            .await
            .unwrap();
        assert!(signed.is_signed());

        let methods = [VerificationMethod::assertion("did:example:issuer#key-1", vk)];
        verify_proof(&signed, &methods, None).unwrap();
    }

    #[tokio::test]
    async fn attach_rejects_already_signed() {
        let keys = InMemoryKeyStore::new();
        keys.generate("issuer-key");

        let signed = attach_proof(unsigned(), &keys, "issuer-key", "did:example:issuer#key-1")
            .await
            .unwrap();
        let err = attach_proof(signed, &keys, "issuer-key", "did:example:issuer#key-1")
            .await
            .unwrap_err();
        assert!(matches!(err, ProofError::AlreadySigned));
    }

    #[tokio::test]
    async fn attach_with_unknown_key_fails() {
        let keys = InMemoryKeyStore::new();
        let err = attach_proof(unsigned(), &keys, "nope", "did:example:issuer#key-1")
            .await
            .unwrap_err();
        assert!(matches!(err, ProofError::KeyStore(KeyStoreError::KeyNotFound(_))));
    }

    #[tokio::test]
    async fn tampered_subject_fails_verification() {
        let keys = InMemoryKeyStore::new();
        let vk = keys.generate("issuer-key");

        let mut signed =
            attach_proof(unsigned(), &keys, "issuer-key", "did:example:issuer#key-1")
                .await
                .unwrap();
        signed.credential_subject = json!({"id": "did:example:alice", "level": 9});

        let methods = [VerificationMethod::assertion("did:example:issuer#key-1", vk)];
        let err = verify_proof(&signed, &methods, None).unwrap_err();
        assert!(matches!(err, ProofError::SignatureInvalid(_)));
    }

    #[tokio::test]
    async fn wrong_key_fails_verification() {
        let keys = InMemoryKeyStore::new();
        keys.generate("issuer-key");
        let other_vk = keys.generate("other-key");

        let signed = attach_proof(unsigned(), &keys, "issuer-key", "did:example:issuer#key-1")
            .await
            .unwrap();

        let methods = [VerificationMethod::assertion("did:example:issuer#key-1", other_vk)];
        let err = verify_proof(&signed, &methods, None).unwrap_err();
        assert!(matches!(err, ProofError::SignatureInvalid(_)));
    }

    #[tokio::test]
    async fn unknown_verification_method_is_distinct_from_bad_signature() {
        let keys = InMemoryKeyStore::new();
        let vk = keys.generate("issuer-key");

        let signed = attach_proof(unsigned(), &keys, "issuer-key", "did:example:issuer#key-9")
            .await
            .unwrap();

        let methods = [VerificationMethod::assertion("did:example:issuer#key-1", vk)];
        let err = verify_proof(&signed, &methods, None).unwrap_err();
        assert!(matches!(err, ProofError::UnknownVerificationMethod(_)));
    }

    #[tokio::test]
    async fn purpose_mismatch_is_rejected_before_signature_math() {
        let keys = InMemoryKeyStore::new();
        let vk = keys.generate("issuer-key");

        let signed = attach_proof(unsigned(), &keys, "issuer-key", "did:example:issuer#auth-1")
            .await
            .unwrap();

        let methods = [VerificationMethod {
            id: "did:example:issuer#auth-1".to_string(),
            purpose: ProofPurpose::Authentication,
            public_key: vk,
        }];
        let err = verify_proof(&signed, &methods, None).unwrap_err();
        assert!(matches!(err, ProofError::MethodPurposeMismatch { .. }));
    }

    #[tokio::test]
    async fn malformed_proof_value_is_rejected() {
        let keys = InMemoryKeyStore::new();
        let vk = keys.generate("issuer-key");

        let mut signed =
            attach_proof(unsigned(), &keys, "issuer-key", "did:example:issuer#key-1")
                .await
                .unwrap();
        if let Some(proof) = signed.proof.as_mut() {
            proof.proof_value = "zz-not-hex".to_string();
        }

        let methods = [VerificationMethod::assertion("did:example:issuer#key-1", vk)];
        let err = verify_proof(&signed, &methods, None).unwrap_err();
        assert!(matches!(err, ProofError::MalformedProofValue(_)));
    }

    #[test]
    fn unsigned_credential_is_not_signed() {
        let cred = unsigned();
        let err = verify_proof(&cred, &[], None).unwrap_err();
        assert!(matches!(err, ProofError::NotSigned));
    }

    #[tokio::test]
    async fn cache_does_not_change_outcome() {
        let keys = InMemoryKeyStore::new();
        let vk = keys.generate("issuer-key");
        let cache = DigestCache::new();

        let signed = attach_proof(unsigned(), &keys, "issuer-key", "did:example:issuer#key-1")
            .await
            .unwrap();
        let methods = [VerificationMethod::assertion("did:example:issuer#key-1", vk)];

        verify_proof(&signed, &methods, Some(&cache)).unwrap();
        // Second pass hits the cache; same verdict.
        verify_proof(&signed, &methods, Some(&cache)).unwrap();
        assert_eq!(cache.len(), 1);
    }
}
