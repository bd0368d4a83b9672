//! # In-Memory Capability Providers
//!
//! Ready-made implementations of the pipeline's external capabilities,
//! backed by process-local maps. They serve development, tests, and
//! single-node deployments; distributed deployments supply their own
//! implementations of the same traits.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use jsonschema::Validator;
use serde_json::Value;
use tracing::debug;

use credens_status::{StatusList, StatusRegistry};
use credens_vc::VerificationMethod;

use crate::capabilities::{
    IssuerResolver, ResolveError, ResolvedIssuer, SchemaCheck, SchemaValidator, StatusListStore,
    StatusStoreError, TrustPolicy,
};

/// Issuer resolver over a fixed in-memory registry.
#[derive(Debug, Default)]
pub struct StaticResolver {
    issuers: DashMap<String, Vec<VerificationMethod>>,
}

impl StaticResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self {
            issuers: DashMap::new(),
        }
    }

    /// Register (or replace) an issuer's verification methods.
    pub fn register(&self, issuer: impl Into<String>, methods: Vec<VerificationMethod>) {
        self.issuers.insert(issuer.into(), methods);
    }

    /// Remove an issuer. Subsequent resolutions return `NotFound`.
    pub fn deregister(&self, issuer: &str) {
        self.issuers.remove(issuer);
    }
}

#[async_trait]
impl IssuerResolver for StaticResolver {
    async fn resolve(&self, issuer: &str) -> Result<ResolvedIssuer, ResolveError> {
        let methods = self
            .issuers
            .get(issuer)
            .ok_or_else(|| ResolveError::NotFound(issuer.to_string()))?;
        Ok(ResolvedIssuer {
            issuer: issuer.to_string(),
            verification_methods: methods.clone(),
        })
    }
}

#[async_trait]
impl StatusListStore for StatusRegistry {
    async fn load(&self, list_id: &str) -> Result<Arc<StatusList>, StatusStoreError> {
        self.get(list_id)
            .ok_or_else(|| StatusStoreError::NotFound(list_id.to_string()))
    }

    async fn persist(&self, list: &StatusList) -> Result<(), StatusStoreError> {
        self.insert(list.clone());
        Ok(())
    }
}

/// Schema validator over a set of pre-compiled JSON Schemas.
///
/// Schemas are compiled once at registration; validation is a pure
/// in-memory check with no `$ref` network fetches.
#[derive(Default)]
pub struct JsonSchemaValidator {
    validators: DashMap<String, Arc<Validator>>,
}

impl JsonSchemaValidator {
    /// Create an empty validator registry.
    pub fn new() -> Self {
        Self {
            validators: DashMap::new(),
        }
    }

    /// Compile and register a schema under the given identifier.
    pub fn register(&self, schema_id: impl Into<String>, schema: &Value) -> Result<(), String> {
        let schema_id = schema_id.into();
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts
            .build(schema)
            .map_err(|e| format!("schema {schema_id} failed to compile: {e}"))?;
        self.validators.insert(schema_id, Arc::new(validator));
        Ok(())
    }
}

impl std::fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsonSchemaValidator({} schemas)", self.validators.len())
    }
}

#[async_trait]
impl SchemaValidator for JsonSchemaValidator {
    async fn validate(&self, schema_id: &str, subject: &Value) -> Result<SchemaCheck, String> {
        let validator = self
            .validators
            .get(schema_id)
            .map(|entry| Arc::clone(&entry))
            .ok_or_else(|| format!("unknown schema: {schema_id}"))?;

        let errors: Vec<String> = validator
            .iter_errors(subject)
            .map(|e| format!("{}: {e}", e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(SchemaCheck::pass())
        } else {
            debug!(schema_id, violations = errors.len(), "schema check failed");
            Ok(SchemaCheck::fail(errors))
        }
    }
}

/// Trust policy that accepts exactly the issuers on an allow list.
///
/// An issuer may be allowed for all credential types or restricted to a
/// named set.
#[derive(Debug, Default)]
pub struct AllowListTrustPolicy {
    allowed: DashMap<String, Option<Vec<String>>>,
}

impl AllowListTrustPolicy {
    /// Create an empty (trust-nobody) policy.
    pub fn new() -> Self {
        Self {
            allowed: DashMap::new(),
        }
    }

    /// Trust an issuer for credentials of any type.
    pub fn allow(&self, issuer: impl Into<String>) {
        self.allowed.insert(issuer.into(), None);
    }

    /// Trust an issuer only for credentials carrying at least one of the
    /// given types.
    pub fn allow_for_types(&self, issuer: impl Into<String>, types: Vec<String>) {
        self.allowed.insert(issuer.into(), Some(types));
    }

    /// Remove an issuer from the allow list.
    pub fn revoke_trust(&self, issuer: &str) {
        self.allowed.remove(issuer);
    }
}

#[async_trait]
impl TrustPolicy for AllowListTrustPolicy {
    async fn is_trusted(&self, issuer: &str, types: &[String]) -> Result<bool, String> {
        Ok(match self.allowed.get(issuer) {
            None => false,
            Some(entry) => match entry.value() {
                None => true,
                Some(allowed_types) => {
                    types.iter().any(|t| allowed_types.contains(t))
                }
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credens_crypto::InMemoryKeyStore;
    use credens_status::StatusPurpose;
    use serde_json::json;

    #[tokio::test]
    async fn static_resolver_roundtrip() {
        let resolver = StaticResolver::new();
        let keys = InMemoryKeyStore::new();
        let vk = keys.generate("k1");
        resolver.register(
            "did:example:issuer",
            vec![VerificationMethod::assertion("did:example:issuer#key-1", vk)],
        );

        let resolved = resolver.resolve("did:example:issuer").await.unwrap();
        assert_eq!(resolved.issuer, "did:example:issuer");
        assert_eq!(resolved.verification_methods.len(), 1);

        resolver.deregister("did:example:issuer");
        assert!(matches!(
            resolver.resolve("did:example:issuer").await,
            Err(ResolveError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn registry_as_status_store() {
        let registry = StatusRegistry::new();
        let list = registry
            .create("did:example:issuer", StatusPurpose::Revocation, 64)
            .unwrap();

        let loaded = registry.load(list.id()).await.unwrap();
        assert!(Arc::ptr_eq(&loaded, &list));

        assert!(matches!(
            registry.load("missing").await,
            Err(StatusStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn schema_validator_passes_and_fails() {
        let schemas = JsonSchemaValidator::new();
        schemas
            .register(
                "https://schemas.example/degree.json",
                &json!({
                    "type": "object",
                    "required": ["id", "degree"],
                    "properties": {
                        "id": {"type": "string"},
                        "degree": {"type": "string"}
                    }
                }),
            )
            .unwrap();

        let ok = schemas
            .validate(
                "https://schemas.example/degree.json",
                &json!({"id": "did:example:alice", "degree": "BSc"}),
            )
            .await
            .unwrap();
        assert!(ok.valid);

        let bad = schemas
            .validate(
                "https://schemas.example/degree.json",
                &json!({"id": "did:example:alice"}),
            )
            .await
            .unwrap();
        assert!(!bad.valid);
        assert!(!bad.errors.is_empty());
    }

    #[tokio::test]
    async fn unknown_schema_is_a_validator_error_not_a_violation() {
        let schemas = JsonSchemaValidator::new();
        let err = schemas.validate("missing", &json!({})).await.unwrap_err();
        assert!(err.contains("unknown schema"));
    }

    #[test]
    fn invalid_schema_fails_registration() {
        let schemas = JsonSchemaValidator::new();
        let err = schemas
            .register("bad", &json!({"type": "not-a-type"}))
            .unwrap_err();
        assert!(err.contains("failed to compile"));
    }

    #[tokio::test]
    async fn allow_list_policy() {
        let policy = AllowListTrustPolicy::new();
        assert!(!policy.is_trusted("did:example:issuer", &[]).await.unwrap());

        policy.allow("did:example:issuer");
        assert!(policy.is_trusted("did:example:issuer", &[]).await.unwrap());

        policy.revoke_trust("did:example:issuer");
        assert!(!policy.is_trusted("did:example:issuer", &[]).await.unwrap());
    }

    #[tokio::test]
    async fn type_scoped_trust() {
        let policy = AllowListTrustPolicy::new();
        policy.allow_for_types(
            "did:example:issuer",
            vec!["UniversityDegreeCredential".to_string()],
        );

        let degree = vec![
            "VerifiableCredential".to_string(),
            "UniversityDegreeCredential".to_string(),
        ];
        let license = vec![
            "VerifiableCredential".to_string(),
            "DriversLicenseCredential".to_string(),
        ];
        assert!(policy.is_trusted("did:example:issuer", &degree).await.unwrap());
        assert!(!policy.is_trusted("did:example:issuer", &license).await.unwrap());
    }
}
