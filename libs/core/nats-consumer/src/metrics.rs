//! Prometheus metrics for the normalize consumer loop.
//!
//! DLQ publish counts live in [`crate::dlq::DlqRouter`]; everything else
//! about a delivery attempt is recorded here.

use metrics::{counter, histogram};
use std::time::Duration;

/// Metrics helper scoped to one consumer's subject.
#[derive(Clone)]
pub struct ConsumerMetrics {
    /// Filter subject for labeling
    subject: String,
    /// Durable consumer name for labeling
    consumer: String,
}

impl ConsumerMetrics {
    /// Create new ConsumerMetrics
    pub fn new(subject: impl Into<String>, consumer: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            consumer: consumer.into(),
        }
    }

    /// Record a message acknowledged after successful processing
    pub fn message_success(&self) {
        counter!(
            "normalize_messages_total",
            "subject" => self.subject.clone(),
            "consumer" => self.consumer.clone(),
            "result" => "success"
        )
        .increment(1);
    }

    /// Record a message negatively acknowledged for redelivery
    ///
    /// `attempt` is the delivery count of the attempt that just failed.
    pub fn message_retry(&self, attempt: i64) {
        counter!(
            "normalize_messages_total",
            "subject" => self.subject.clone(),
            "consumer" => self.consumer.clone(),
            "result" => "retry"
        )
        .increment(1);

        counter!(
            "normalize_redeliveries_total",
            "subject" => self.subject.clone(),
            "consumer" => self.consumer.clone(),
            "attempt" => attempt.to_string()
        )
        .increment(1);
    }

    /// Record a message terminated and routed to the dead-letter stream
    pub fn message_dlq(&self) {
        counter!(
            "normalize_messages_total",
            "subject" => self.subject.clone(),
            "consumer" => self.consumer.clone(),
            "result" => "dlq"
        )
        .increment(1);
    }

    /// Record how long one processing attempt took
    pub fn processing_duration(&self, duration: Duration) {
        histogram!(
            "normalize_processing_duration_seconds",
            "subject" => self.subject.clone(),
            "consumer" => self.consumer.clone()
        )
        .record(duration.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = ConsumerMetrics::new("vendor.*.webhook.received", "normalize-worker");
        assert_eq!(metrics.subject, "vendor.*.webhook.received");
        assert_eq!(metrics.consumer, "normalize-worker");
    }
}
