//! Dead-letter routing.
//!
//! Republishes the original message bytes and headers, unmodified, to a
//! subject derived from the base DLQ subject plus the termination reason.
//! The source subject rides along in one added header.

use crate::consumer::InboundMessage;
use crate::error::ConsumerError;
use crate::outcome::DlqReason;
use async_nats::jetstream::stream::Config as JsStreamConfig;
use async_nats::jetstream::Context;
use async_nats::HeaderMap;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Header carrying the subject the message originally arrived on.
pub const SOURCE_SUBJECT_HEADER: &str = "Dlq-Source-Subject";

/// Router for dead-letter publishes.
pub struct DlqRouter {
    jetstream: Arc<Context>,
    dlq_stream: String,
    subject_base: String,
    consumer_label: String,
}

impl DlqRouter {
    /// Create a new router.
    ///
    /// `consumer_label` identifies the publishing consumer in the
    /// `dlq_messages_total` metric.
    pub fn new(
        jetstream: Arc<Context>,
        dlq_stream: impl Into<String>,
        subject_base: impl Into<String>,
        consumer_label: impl Into<String>,
    ) -> Self {
        Self {
            jetstream,
            dlq_stream: dlq_stream.into(),
            subject_base: subject_base.into(),
            consumer_label: consumer_label.into(),
        }
    }

    /// Ensure the DLQ stream exists, creating it if necessary.
    pub async fn ensure_stream(&self) -> Result<(), ConsumerError> {
        match self.jetstream.get_stream(&self.dlq_stream).await {
            Ok(_) => {
                debug!(stream = %self.dlq_stream, "DLQ stream already exists");
                Ok(())
            }
            Err(_) => {
                info!(stream = %self.dlq_stream, "Creating DLQ stream");

                self.jetstream
                    .create_stream(JsStreamConfig {
                        name: self.dlq_stream.clone(),
                        subjects: vec![format!("{}.>", self.subject_base)],
                        max_messages: 10_000,
                        max_age: Duration::from_secs(30 * 24 * 60 * 60), // 30 days
                        ..Default::default()
                    })
                    .await
                    .map_err(ConsumerError::from_jetstream_error)?;

                info!(stream = %self.dlq_stream, "DLQ stream created");
                Ok(())
            }
        }
    }

    /// Subject a reason routes to.
    pub fn subject_for(&self, reason: DlqReason) -> String {
        dlq_subject(&self.subject_base, reason)
    }

    /// Publish the message to the dead-letter stream.
    ///
    /// The payload is byte-identical to the original; original headers are
    /// passed through with the source subject appended. Callers treat a
    /// returned error as best-effort failure — the original message is
    /// terminated regardless.
    pub async fn publish(
        &self,
        message: &InboundMessage,
        reason: DlqReason,
    ) -> Result<(), ConsumerError> {
        let subject = self.subject_for(reason);

        let mut headers = message.headers().cloned().unwrap_or_else(HeaderMap::new);
        headers.insert(SOURCE_SUBJECT_HEADER, message.subject.as_str());

        let ack = self
            .jetstream
            .publish_with_headers(subject.clone(), headers, message.payload().clone())
            .await
            .map_err(|e| ConsumerError::publish_error(e.to_string()))?
            .await
            .map_err(|e| ConsumerError::publish_error(e.to_string()))?;

        counter!(
            "dlq_messages_total",
            "consumer" => self.consumer_label.clone(),
            "reason" => reason.label(),
            "subject" => message.subject.clone()
        )
        .increment(1);

        debug!(
            subject = %subject,
            source_subject = %message.subject,
            reason = %reason,
            dlq_sequence = ack.sequence,
            "Message routed to dead-letter stream"
        );

        Ok(())
    }
}

/// Derive the dead-letter subject for a reason.
pub fn dlq_subject(base: &str, reason: DlqReason) -> String {
    format!("{}.{}", base, reason.subject_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_derivation() {
        let base = "dlq.vendor.webhook";
        assert_eq!(
            dlq_subject(base, DlqReason::SchemaInvalid),
            "dlq.vendor.webhook.schema-invalid"
        );
        assert_eq!(
            dlq_subject(base, DlqReason::MaxDeliver),
            "dlq.vendor.webhook.max-deliver"
        );
        assert_eq!(
            dlq_subject(base, DlqReason::NonRetryable),
            "dlq.vendor.webhook.non-retryable"
        );
    }
}
