//! Per-call verification options. The revocation failure policy has no
//! default: deployments must decide explicitly whether an unreachable
//! status list blocks acceptance or degrades it.

use std::time::Duration;

use credens_core::Timestamp;

/// What to do when a credential's status list cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationFailurePolicy {
    /// No verdict without a revocation check: return Inconclusive.
    HardFail,
    /// Accept the credential, flag the gap as a warning, and log it.
    Degrade,
}

/// Options controlling one verification call.
#[derive(Debug, Clone)]
pub struct VerificationOptions {
    /// Policy for unreachable status lists. Mandatory.
    pub revocation_failure_policy: RevocationFailurePolicy,

    /// Upper bound on each external call (resolution, status fetch,
    /// schema validation, trust lookup).
    pub external_timeout: Duration,

    /// Instant to evaluate the validity window against. `None` means
    /// the wall clock at verification time.
    pub evaluation_time: Option<Timestamp>,

    /// Whether to validate the subject against a declared schema.
    pub validate_schema: bool,

    /// Whether to consult the trust policy after all other stages pass.
    pub check_trust: bool,
}

impl VerificationOptions {
    /// Default timeout for external calls.
    pub const DEFAULT_EXTERNAL_TIMEOUT: Duration = Duration::from_secs(10);

    /// Options with the given revocation policy and defaults elsewhere:
    /// 10-second external timeout, wall-clock evaluation, schema and
    /// trust stages off.
    pub fn new(revocation_failure_policy: RevocationFailurePolicy) -> Self {
        Self {
            revocation_failure_policy,
            external_timeout: Self::DEFAULT_EXTERNAL_TIMEOUT,
            evaluation_time: None,
            validate_schema: false,
            check_trust: false,
        }
    }

    /// Set the external call timeout.
    pub fn with_external_timeout(mut self, timeout: Duration) -> Self {
        self.external_timeout = timeout;
        self
    }

    /// Evaluate the validity window at a fixed instant instead of now.
    pub fn with_evaluation_time(mut self, at: Timestamp) -> Self {
        self.evaluation_time = Some(at);
        self
    }

    /// Enable schema validation for credentials that declare a schema.
    pub fn with_schema_validation(mut self) -> Self {
        self.validate_schema = true;
        self
    }

    /// Enable the trust policy stage.
    pub fn with_trust_check(mut self) -> Self {
        self.check_trust = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let opts = VerificationOptions::new(RevocationFailurePolicy::HardFail);
        assert_eq!(opts.external_timeout, Duration::from_secs(10));
        assert!(opts.evaluation_time.is_none());
        assert!(!opts.validate_schema);
        assert!(!opts.check_trust);
    }

    #[test]
    fn builders_compose() {
        let at = Timestamp::from_epoch_secs(1_700_000_000).unwrap();
        let opts = VerificationOptions::new(RevocationFailurePolicy::Degrade)
            .with_external_timeout(Duration::from_millis(250))
            .with_evaluation_time(at)
            .with_schema_validation()
            .with_trust_check();

        assert_eq!(opts.revocation_failure_policy, RevocationFailurePolicy::Degrade);
        assert_eq!(opts.external_timeout, Duration::from_millis(250));
        assert_eq!(opts.evaluation_time, Some(at));
        assert!(opts.validate_schema);
        assert!(opts.check_trust);
    }
}
