//! Outcome decision for one delivery attempt.
//!
//! A single pure function maps (delivery count, classification) to exactly
//! one [`ProcessingOutcome`]. The worker loop interprets the outcome once;
//! nothing else in the pipeline acks, naks, or terminates messages.

use crate::classifier::{ClassificationResult, FailureReason};

/// Why a message was dead-lettered.
///
/// Travels in the DLQ subject suffix (kebab-case) and in the
/// `dlq_messages_total` reason label (snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DlqReason {
    /// The payload can never be processed.
    SchemaInvalid,
    /// The delivery budget is exhausted.
    MaxDeliver,
    /// A terminal business error on a well-formed payload.
    NonRetryable,
}

impl DlqReason {
    /// Subject suffix for the dead-letter publish.
    pub fn subject_suffix(&self) -> &'static str {
        match self {
            DlqReason::SchemaInvalid => "schema-invalid",
            DlqReason::MaxDeliver => "max-deliver",
            DlqReason::NonRetryable => "non-retryable",
        }
    }

    /// Metric label value.
    pub fn label(&self) -> &'static str {
        match self {
            DlqReason::SchemaInvalid => "schema_invalid",
            DlqReason::MaxDeliver => "max_deliver",
            DlqReason::NonRetryable => "non_retryable",
        }
    }
}

impl std::fmt::Display for DlqReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Exactly one outcome per message per delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// Processing succeeded; acknowledge the message.
    Ack,
    /// Request redelivery after the given delay.
    RetryWithDelay(u64),
    /// Terminate the message and route a copy to the dead-letter stream.
    DeadLetter(DlqReason),
}

/// Redelivery policy knobs for [`decide`].
#[derive(Debug, Clone, Copy)]
pub struct RedeliveryPolicy {
    /// Maximum deliveries before a message is dead-lettered.
    pub max_deliver: i64,
    /// Fixed nak delay for retryable failures, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for RedeliveryPolicy {
    fn default() -> Self {
        Self {
            max_deliver: 5,
            retry_delay_ms: 5_000,
        }
    }
}

/// Resolve the delivery count from broker metadata.
///
/// The broker count wins when present and positive. A message flagged as
/// redelivered without a count is assumed to be on its second delivery.
/// Anything else is a first delivery.
pub fn resolve_delivery_count(broker_count: Option<i64>, redelivered: bool) -> i64 {
    match broker_count {
        Some(count) if count > 0 => count,
        _ if redelivered => 2,
        _ => 1,
    }
}

/// Decide the outcome of a failed delivery attempt.
///
/// Decision table:
///
/// | delivery count | classification | outcome |
/// |---|---|---|
/// | any | schema_invalid | DeadLetter(schema_invalid) |
/// | >= max_deliver | any | DeadLetter(max_deliver) |
/// | < max_deliver | retryable | RetryWithDelay(retry_delay_ms) |
/// | < max_deliver | non-retryable | DeadLetter(non_retryable) |
///
/// Schema failures can never succeed on retry, so they bypass the attempt
/// budget entirely; the budget is reserved for genuinely transient faults.
pub fn decide(
    delivery_count: i64,
    classification: ClassificationResult,
    policy: &RedeliveryPolicy,
) -> ProcessingOutcome {
    if classification.reason == FailureReason::SchemaInvalid {
        return ProcessingOutcome::DeadLetter(DlqReason::SchemaInvalid);
    }

    if delivery_count >= policy.max_deliver {
        return ProcessingOutcome::DeadLetter(DlqReason::MaxDeliver);
    }

    if classification.retryable {
        ProcessingOutcome::RetryWithDelay(policy.retry_delay_ms)
    } else {
        ProcessingOutcome::DeadLetter(DlqReason::NonRetryable)
    }
}
