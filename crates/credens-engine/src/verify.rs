//! # Verification Pipeline
//!
//! Runs a credential through a fixed stage order:
//!
//! 1. structural checks
//! 2. proof presence and form
//! 3. issuer resolution
//! 4. signature verification
//! 5. validity window
//! 6. revocation/suspension status
//! 7. schema validation (opt-in)
//! 8. trust policy (opt-in)
//!
//! The first failing stage determines the verdict; later stages do not
//! run. Every external call (resolution, status fetch, schema check,
//! trust lookup) is bounded by the configured timeout, and a timeout
//! yields `Inconclusive(Cancelled)` — never Invalid, because the
//! credential was not shown to be bad.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, warn};

use credens_core::{DigestCache, Timestamp};
use credens_status::StatusPurpose;
use credens_vc::{verify_proof, Credential};

use crate::capabilities::{
    IssuerResolver, ResolveError, ResolvedIssuer, SchemaValidator, StatusListStore,
    StatusStoreError, TrustPolicy,
};
use crate::options::{RevocationFailurePolicy, VerificationOptions};
use crate::result::{
    InconclusiveCause, InvalidReason, VerificationResult, VerificationWarning,
};

/// The staged credential verification engine.
///
/// Holds the injected capabilities and a shared digest cache. One engine
/// serves many concurrent verifications.
pub struct VerificationEngine {
    resolver: Arc<dyn IssuerResolver>,
    status_store: Arc<dyn StatusListStore>,
    schema_validator: Option<Arc<dyn SchemaValidator>>,
    trust_policy: Option<Arc<dyn TrustPolicy>>,
    digest_cache: Arc<DigestCache>,
}

impl VerificationEngine {
    /// Build an engine with the mandatory capabilities. Schema and trust
    /// stages stay disabled until their providers are supplied.
    pub fn new(resolver: Arc<dyn IssuerResolver>, status_store: Arc<dyn StatusListStore>) -> Self {
        Self {
            resolver,
            status_store,
            schema_validator: None,
            trust_policy: None,
            digest_cache: Arc::new(DigestCache::new()),
        }
    }

    /// Attach a schema validator for the opt-in schema stage.
    pub fn with_schema_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.schema_validator = Some(validator);
        self
    }

    /// Attach a trust policy for the opt-in trust stage.
    pub fn with_trust_policy(mut self, policy: Arc<dyn TrustPolicy>) -> Self {
        self.trust_policy = Some(policy);
        self
    }

    /// Use a shared digest cache instead of a private one.
    pub fn with_digest_cache(mut self, cache: Arc<DigestCache>) -> Self {
        self.digest_cache = cache;
        self
    }

    /// The engine's digest cache.
    pub fn digest_cache(&self) -> &Arc<DigestCache> {
        &self.digest_cache
    }

    /// Verify one credential.
    pub async fn verify(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> VerificationResult {
        self.verify_with_resolution_cache(credential, options, None)
            .await
    }

    /// Verify a batch of independent credentials, preserving input order.
    ///
    /// One verdict per credential; a failure in one never affects the
    /// others. Issuer resolutions are cached for the duration of the
    /// batch, so a thousand credentials from one issuer cost one
    /// resolution.
    pub async fn verify_batch(
        &self,
        credentials: &[Credential],
        options: &VerificationOptions,
    ) -> Vec<VerificationResult> {
        let resolutions: DashMap<String, ResolvedIssuer> = DashMap::new();
        let mut results = Vec::with_capacity(credentials.len());
        for credential in credentials {
            results.push(
                self.verify_with_resolution_cache(credential, options, Some(&resolutions))
                    .await,
            );
        }
        results
    }

    async fn verify_with_resolution_cache(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
        resolutions: Option<&DashMap<String, ResolvedIssuer>>,
    ) -> VerificationResult {
        // Stage 1: structure.
        if let Err(e) = credential.check_structure() {
            debug!(error = %e, "structural check failed");
            return VerificationResult::invalid(InvalidReason::StructurallyInvalid {
                detail: e.to_string(),
            });
        }

        // Stage 2: proof presence.
        let Some(proof) = credential.proof.as_ref() else {
            return VerificationResult::invalid(InvalidReason::ProofInvalid {
                detail: "credential has no proof".to_string(),
            });
        };
        debug!(
            issuer = %credential.issuer,
            method = %proof.verification_method,
            "verifying credential"
        );

        // Stage 3: issuer resolution.
        let resolved = match self
            .resolve_issuer(&credential.issuer, options.external_timeout, resolutions)
            .await
        {
            Ok(resolved) => resolved,
            Err(verdict) => return verdict,
        };

        // Stage 4: signature.
        if let Err(e) = verify_proof(
            credential,
            &resolved.verification_methods,
            Some(&self.digest_cache),
        ) {
            debug!(error = %e, "proof check failed");
            return VerificationResult::invalid(InvalidReason::ProofInvalid {
                detail: e.to_string(),
            });
        }

        // Stage 5: validity window.
        let at = options.evaluation_time.unwrap_or_else(Timestamp::now);
        if at < credential.issuance_date {
            return VerificationResult::invalid(InvalidReason::Expired {
                detail: format!(
                    "not valid before {} (evaluated at {at})",
                    credential.issuance_date
                ),
            });
        }
        if let Some(expiration) = credential.expiration_date {
            if at >= expiration {
                return VerificationResult::invalid(InvalidReason::Expired {
                    detail: format!("expired at {expiration} (evaluated at {at})"),
                });
            }
        }

        // Stage 6: revocation/suspension.
        let mut warnings = Vec::new();
        if let Some(entry) = credential.credential_status.as_ref() {
            match self.check_status(credential, options).await {
                Ok(Some(reason)) => return VerificationResult::invalid(reason),
                Ok(None) => {}
                Err(StatusFailure::Timeout) => {
                    return VerificationResult::inconclusive(InconclusiveCause::Cancelled);
                }
                Err(StatusFailure::Unreachable(detail)) => {
                    match options.revocation_failure_policy {
                        RevocationFailurePolicy::HardFail => {
                            return VerificationResult::inconclusive(
                                InconclusiveCause::TransientUnavailable { detail },
                            );
                        }
                        RevocationFailurePolicy::Degrade => {
                            warn!(
                                list_id = %entry.list_id,
                                %detail,
                                "status list unreachable; accepting without revocation check"
                            );
                            warnings.push(VerificationWarning::StatusListUnreachable {
                                list_id: entry.list_id.clone(),
                                detail,
                            });
                        }
                    }
                }
            }
        }

        // Stage 7: schema (opt-in).
        if options.validate_schema {
            if let Some(schema_ref) = credential.credential_schema.as_ref() {
                match self.check_schema(credential, &schema_ref.id, options).await {
                    Ok(None) => {}
                    Ok(Some(verdict)) => return verdict,
                    Err(verdict) => return verdict,
                }
            }
        }

        // Stage 8: trust (opt-in).
        if options.check_trust {
            if let Some(verdict) = self
                .check_trust(&credential.issuer, &credential.types, options)
                .await
            {
                return verdict;
            }
        }

        debug!(issuer = %credential.issuer, warnings = warnings.len(), "credential valid");
        VerificationResult::Valid { warnings }
    }

    async fn resolve_issuer(
        &self,
        issuer: &str,
        timeout: Duration,
        resolutions: Option<&DashMap<String, ResolvedIssuer>>,
    ) -> Result<ResolvedIssuer, VerificationResult> {
        if let Some(cache) = resolutions {
            if let Some(hit) = cache.get(issuer) {
                return Ok(hit.clone());
            }
        }

        let resolved = match bounded(timeout, self.resolver.resolve(issuer)).await {
            Ok(Ok(resolved)) => resolved,
            Ok(Err(ResolveError::NotFound(issuer))) => {
                return Err(VerificationResult::invalid(
                    InvalidReason::IssuerUnresolvable { issuer },
                ));
            }
            Ok(Err(ResolveError::Unavailable(detail))) => {
                return Err(VerificationResult::inconclusive(
                    InconclusiveCause::TransientUnavailable {
                        detail: format!("issuer resolution: {detail}"),
                    },
                ));
            }
            Err(Elapsed) => {
                return Err(VerificationResult::inconclusive(InconclusiveCause::Cancelled));
            }
        };

        if let Some(cache) = resolutions {
            cache.insert(issuer.to_string(), resolved.clone());
        }
        Ok(resolved)
    }

    /// Returns `Ok(Some(reason))` when the status bit rejects the
    /// credential, `Ok(None)` when it is clear.
    async fn check_status(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> Result<Option<InvalidReason>, StatusFailure> {
        // Caller checked presence.
        let Some(entry) = credential.credential_status.as_ref() else {
            return Ok(None);
        };

        let list = match bounded(
            options.external_timeout,
            self.status_store.load(&entry.list_id),
        )
        .await
        {
            Ok(Ok(list)) => list,
            Ok(Err(StatusStoreError::NotFound(id))) => {
                return Err(StatusFailure::Unreachable(format!(
                    "status list not found: {id}"
                )));
            }
            Ok(Err(StatusStoreError::Unreachable(detail))) => {
                return Err(StatusFailure::Unreachable(detail));
            }
            Err(Elapsed) => return Err(StatusFailure::Timeout),
        };

        if list.purpose() != entry.status_purpose {
            return Ok(Some(InvalidReason::StructurallyInvalid {
                detail: format!(
                    "status entry claims {} but list {} is a {} list",
                    entry.status_purpose,
                    entry.list_id,
                    list.purpose()
                ),
            }));
        }

        let set = match list.get(entry.index) {
            Ok(set) => set,
            Err(e) => {
                return Ok(Some(InvalidReason::StructurallyInvalid {
                    detail: e.to_string(),
                }));
            }
        };

        if !set {
            return Ok(None);
        }
        Ok(Some(match entry.status_purpose {
            StatusPurpose::Revocation => InvalidReason::Revoked,
            StatusPurpose::Suspension => InvalidReason::Suspended,
        }))
    }

    /// Returns `Ok(Some(verdict))` on schema violation, `Err(verdict)`
    /// when the validator itself could not run.
    async fn check_schema(
        &self,
        credential: &Credential,
        schema_id: &str,
        options: &VerificationOptions,
    ) -> Result<Option<VerificationResult>, VerificationResult> {
        let Some(validator) = self.schema_validator.as_ref() else {
            return Err(VerificationResult::inconclusive(
                InconclusiveCause::TransientUnavailable {
                    detail: "schema validation requested but no validator configured".to_string(),
                },
            ));
        };

        let check = match bounded(
            options.external_timeout,
            validator.validate(schema_id, &credential.credential_subject),
        )
        .await
        {
            Ok(Ok(check)) => check,
            Ok(Err(detail)) => {
                return Err(VerificationResult::inconclusive(
                    InconclusiveCause::TransientUnavailable {
                        detail: format!("schema validation: {detail}"),
                    },
                ));
            }
            Err(Elapsed) => {
                return Err(VerificationResult::inconclusive(InconclusiveCause::Cancelled));
            }
        };

        if check.valid {
            Ok(None)
        } else {
            Ok(Some(VerificationResult::invalid(
                InvalidReason::SchemaInvalid {
                    errors: check.errors,
                },
            )))
        }
    }

    async fn check_trust(
        &self,
        issuer: &str,
        types: &[String],
        options: &VerificationOptions,
    ) -> Option<VerificationResult> {
        let Some(policy) = self.trust_policy.as_ref() else {
            return Some(VerificationResult::inconclusive(
                InconclusiveCause::TransientUnavailable {
                    detail: "trust check requested but no policy configured".to_string(),
                },
            ));
        };

        match bounded(options.external_timeout, policy.is_trusted(issuer, types)).await {
            Ok(Ok(true)) => None,
            Ok(Ok(false)) => Some(VerificationResult::invalid(
                InvalidReason::UntrustedIssuer {
                    issuer: issuer.to_string(),
                },
            )),
            Ok(Err(detail)) => Some(VerificationResult::inconclusive(
                InconclusiveCause::TransientUnavailable {
                    detail: format!("trust policy: {detail}"),
                },
            )),
            Err(Elapsed) => {
                Some(VerificationResult::inconclusive(InconclusiveCause::Cancelled))
            }
        }
    }
}

impl std::fmt::Debug for VerificationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationEngine")
            .field("schema_validator", &self.schema_validator.is_some())
            .field("trust_policy", &self.trust_policy.is_some())
            .field("cached_digests", &self.digest_cache.len())
            .finish()
    }
}

/// Marker for an exceeded external-call deadline.
struct Elapsed;

enum StatusFailure {
    Timeout,
    Unreachable(String),
}

async fn bounded<F, T>(timeout: Duration, fut: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(timeout, fut).await.map_err(|_| Elapsed)
}
