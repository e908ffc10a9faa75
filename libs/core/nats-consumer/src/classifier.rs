//! Error classification for retry decisions.
//!
//! All retry policy lives here: a processing failure is classified once,
//! from its display text, and the result drives the outcome decision in
//! [`crate::outcome`]. Call sites never make their own retry decisions.

/// Why a failure is (or is not) retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The payload can never parse or validate. Retrying cannot succeed.
    SchemaInvalid,
    /// A transient fault (network, timeout, DNS). Worth retrying.
    Transient,
    /// A business error that will fail the same way on every attempt.
    NonRetryable,
}

/// Result of classifying a processing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub retryable: bool,
    pub reason: FailureReason,
}

impl ClassificationResult {
    pub const fn schema_invalid() -> Self {
        Self {
            retryable: false,
            reason: FailureReason::SchemaInvalid,
        }
    }

    pub const fn transient() -> Self {
        Self {
            retryable: true,
            reason: FailureReason::Transient,
        }
    }

    pub const fn non_retryable() -> Self {
        Self {
            retryable: false,
            reason: FailureReason::NonRetryable,
        }
    }
}

/// Signals that mark a failure as a schema/validation problem.
///
/// Checked before the transient signals so that error text like
/// "schema registry connection refused" dead-letters instead of burning
/// the retry budget on an unfixable payload.
const SCHEMA_SIGNALS: &[&str] = &["schema", "validation"];

/// Signals that mark a failure as transient.
///
/// Deliberately conservative: connection-refused, generic timeouts,
/// DNS resolution, and the broad "connection" substring.
const TRANSIENT_SIGNALS: &[&str] = &[
    "econnrefused",
    "connection refused",
    "etimedout",
    "timed out",
    "timeout",
    "enotfound",
    "dns",
    "connection",
];

/// Classify a processing failure from its display text.
///
/// Matching is case-insensitive substring containment. Anything that is
/// neither a schema signal nor a transient signal is non-retryable.
pub fn classify(error_text: &str) -> ClassificationResult {
    let lowered = error_text.to_lowercase();

    if SCHEMA_SIGNALS.iter().any(|s| lowered.contains(s)) {
        return ClassificationResult::schema_invalid();
    }

    if TRANSIENT_SIGNALS.iter().any(|s| lowered.contains(s)) {
        return ClassificationResult::transient();
    }

    ClassificationResult::non_retryable()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_signals_are_retryable() {
        let cases = [
            "ECONNREFUSED",
            "connect ECONNREFUSED 10.0.0.5:6379",
            "Connection refused",
            "ETIMEDOUT",
            "request timed out after 30s",
            "operation timeout",
            "ENOTFOUND redis.internal",
            "DNS resolution failed",
            "Connection reset by peer",
        ];

        for text in cases {
            let result = classify(text);
            assert!(result.retryable, "expected retryable for {:?}", text);
            assert_eq!(result.reason, FailureReason::Transient);
        }
    }

    #[test]
    fn test_other_errors_are_not_retryable() {
        let cases = [
            "unexpected field value",
            "permission denied",
            "user not authorized",
            "plan does not exist",
        ];

        for text in cases {
            let result = classify(text);
            assert!(!result.retryable, "expected non-retryable for {:?}", text);
            assert_eq!(result.reason, FailureReason::NonRetryable);
        }
    }

    #[test]
    fn test_schema_errors_are_terminal() {
        let result = classify("Schema validation failed: invalid field type");
        assert!(!result.retryable);
        assert_eq!(result.reason, FailureReason::SchemaInvalid);

        let result = classify("payload failed validation");
        assert_eq!(result.reason, FailureReason::SchemaInvalid);
    }

    #[test]
    fn test_schema_signal_wins_over_transient_signal() {
        // "connection" appears, but the schema signal takes precedence:
        // a payload that cannot validate will not start validating on retry.
        let result = classify("schema registry connection refused");
        assert!(!result.retryable);
        assert_eq!(result.reason, FailureReason::SchemaInvalid);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(classify("TIMEOUT").retryable);
        assert!(classify("Timed Out").retryable);
        assert_eq!(
            classify("SCHEMA MISMATCH").reason,
            FailureReason::SchemaInvalid
        );
    }
}
