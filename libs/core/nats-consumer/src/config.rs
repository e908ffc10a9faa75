//! Configuration for JetStream consumers.

use crate::outcome::RedeliveryPolicy;
use std::time::Duration;

/// Stream configuration trait (type-safe constants).
///
/// Implement this trait to define a stream's NATS configuration.
///
/// # Example
///
/// ```rust,ignore
/// struct WebhookStream;
///
/// impl StreamConfig for WebhookStream {
///     const STREAM_NAME: &'static str = "VENDOR_WEBHOOKS";
///     const DURABLE_NAME: &'static str = "normalize-worker";
///     const SUBJECT: &'static str = "vendor.*.webhook.received";
///     const DLQ_STREAM: &'static str = "WEBHOOKS_DLQ";
///     const DLQ_SUBJECT_BASE: &'static str = "dlq.vendor.webhook";
/// }
/// ```
pub trait StreamConfig {
    /// JetStream stream name (e.g., "VENDOR_WEBHOOKS")
    const STREAM_NAME: &'static str;

    /// Durable consumer name, shared across worker instances so the
    /// broker distributes deliveries among them.
    const DURABLE_NAME: &'static str;

    /// Subject filter (e.g., "vendor.*.webhook.received")
    const SUBJECT: &'static str;

    /// Dead letter queue stream name (e.g., "WEBHOOKS_DLQ")
    const DLQ_STREAM: &'static str;

    /// Base subject for dead-letter publishes; the reason is suffixed.
    const DLQ_SUBJECT_BASE: &'static str;

    /// Maximum deliveries before dead-lettering (default: 5)
    const MAX_DELIVER: i64 = 5;

    /// Ack wait timeout in seconds (default: 30)
    const ACK_WAIT_SECS: u64 = 30;
}

/// Consumer loop configuration.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// JetStream stream name
    pub stream_name: String,

    /// Durable consumer name (shared, not per-instance)
    pub durable_name: String,

    /// Subject filter to consume
    pub subject: String,

    /// Dead letter queue stream name
    pub dlq_stream: String,

    /// Base subject for dead-letter publishes
    pub dlq_subject_base: String,

    /// Batch size for fetching messages. Messages are processed strictly
    /// sequentially regardless of batch size.
    pub batch_size: usize,

    /// Fetch timeout
    pub fetch_timeout: Duration,

    /// Maximum deliveries before DLQ
    pub max_deliver: i64,

    /// Fixed nak delay for retryable failures
    pub retry_delay_ms: u64,

    /// Ack wait timeout
    pub ack_wait: Duration,

    /// Bound on a single processor call
    pub process_timeout: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            stream_name: "EVENTS".to_string(),
            durable_name: "event-worker".to_string(),
            subject: ">".to_string(),
            dlq_stream: "EVENTS_DLQ".to_string(),
            dlq_subject_base: "dlq.events".to_string(),
            batch_size: 1,
            fetch_timeout: Duration::from_secs(5),
            max_deliver: 5,
            retry_delay_ms: 5_000,
            ack_wait: Duration::from_secs(30),
            process_timeout: Duration::from_secs(30),
        }
    }
}

impl ConsumerConfig {
    /// Create from a StreamConfig trait.
    pub fn from_stream<S: StreamConfig>() -> Self {
        Self {
            stream_name: S::STREAM_NAME.to_string(),
            durable_name: S::DURABLE_NAME.to_string(),
            subject: S::SUBJECT.to_string(),
            dlq_stream: S::DLQ_STREAM.to_string(),
            dlq_subject_base: S::DLQ_SUBJECT_BASE.to_string(),
            max_deliver: S::MAX_DELIVER,
            ack_wait: Duration::from_secs(S::ACK_WAIT_SECS),
            ..Default::default()
        }
    }

    /// The redelivery policy carried by this configuration.
    pub fn policy(&self) -> RedeliveryPolicy {
        RedeliveryPolicy {
            max_deliver: self.max_deliver,
            retry_delay_ms: self.retry_delay_ms,
        }
    }

    /// Override the durable name.
    pub fn with_durable_name(mut self, name: impl Into<String>) -> Self {
        self.durable_name = name.into();
        self
    }

    /// Override the fetch batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Override the maximum delivery count.
    pub fn with_max_deliver(mut self, max_deliver: i64) -> Self {
        self.max_deliver = max_deliver;
        self
    }

    /// Override the ack wait timeout.
    pub fn with_ack_wait(mut self, ack_wait: Duration) -> Self {
        self.ack_wait = ack_wait;
        self
    }

    /// Override the per-message processing timeout.
    pub fn with_process_timeout(mut self, timeout: Duration) -> Self {
        self.process_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestStream;

    impl StreamConfig for TestStream {
        const STREAM_NAME: &'static str = "TEST_EVENTS";
        const DURABLE_NAME: &'static str = "test-worker";
        const SUBJECT: &'static str = "test.*.received";
        const DLQ_STREAM: &'static str = "TEST_EVENTS_DLQ";
        const DLQ_SUBJECT_BASE: &'static str = "dlq.test.events";
        const MAX_DELIVER: i64 = 3;
    }

    #[test]
    fn test_config_from_stream() {
        let config = ConsumerConfig::from_stream::<TestStream>();
        assert_eq!(config.stream_name, "TEST_EVENTS");
        assert_eq!(config.durable_name, "test-worker");
        assert_eq!(config.subject, "test.*.received");
        assert_eq!(config.dlq_stream, "TEST_EVENTS_DLQ");
        assert_eq!(config.dlq_subject_base, "dlq.test.events");
        assert_eq!(config.max_deliver, 3);
        assert_eq!(config.batch_size, 1);
    }

    #[test]
    fn test_policy_reflects_overrides() {
        let config = ConsumerConfig::from_stream::<TestStream>().with_max_deliver(7);
        let policy = config.policy();
        assert_eq!(policy.max_deliver, 7);
        assert_eq!(policy.retry_delay_ms, 5_000);
    }

    #[test]
    fn test_batch_size_floor() {
        let config = ConsumerConfig::default().with_batch_size(0);
        assert_eq!(config.batch_size, 1);
    }
}
