//! Stream definitions for the coaching domain.

use nats_consumer::StreamConfig;

/// Vendor webhook stream definition.
///
/// Consumed by the normalize worker; all worker instances share the
/// durable name so the broker distributes deliveries among them.
pub struct WebhookStream;

impl StreamConfig for WebhookStream {
    /// Inbound stream for vendor webhooks.
    const STREAM_NAME: &'static str = "VENDOR_WEBHOOKS";

    /// Shared durable consumer name.
    const DURABLE_NAME: &'static str = "normalize-worker";

    /// One subject per vendor.
    const SUBJECT: &'static str = "vendor.*.webhook.received";

    /// Dead letter stream for webhooks that cannot be processed.
    const DLQ_STREAM: &'static str = "WEBHOOKS_DLQ";

    /// Reason suffix is appended per message.
    const DLQ_SUBJECT_BASE: &'static str = "dlq.vendor.webhook";

    /// Deliveries before dead-lettering.
    const MAX_DELIVER: i64 = 5;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nats_consumer::ConsumerConfig;

    #[test]
    fn test_webhook_stream_def() {
        let config = ConsumerConfig::from_stream::<WebhookStream>();
        assert_eq!(config.stream_name, "VENDOR_WEBHOOKS");
        assert_eq!(config.durable_name, "normalize-worker");
        assert_eq!(config.subject, "vendor.*.webhook.received");
        assert_eq!(config.dlq_stream, "WEBHOOKS_DLQ");
        assert_eq!(config.dlq_subject_base, "dlq.vendor.webhook");
        assert_eq!(config.max_deliver, 5);
    }
}
