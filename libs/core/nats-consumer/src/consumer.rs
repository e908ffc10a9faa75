//! JetStream stream/consumer provisioning and message fetch.

use crate::config::ConsumerConfig;
use crate::error::ConsumerError;
use crate::outcome::resolve_delivery_count;
use async_nats::jetstream::consumer::pull::Config as PullConfig;
use async_nats::jetstream::consumer::AckPolicy;
use async_nats::jetstream::stream::Config as JsStreamConfig;
use async_nats::jetstream::Context;
use async_nats::HeaderMap;
use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pull-based consumer over a durable JetStream subscription.
pub struct StreamConsumer {
    jetstream: Arc<Context>,
    config: ConsumerConfig,
}

impl StreamConsumer {
    pub fn new(jetstream: Arc<Context>, config: ConsumerConfig) -> Self {
        Self { jetstream, config }
    }

    /// Ensure the inbound stream exists, creating it if necessary.
    pub async fn ensure_stream(&self) -> Result<(), ConsumerError> {
        match self.jetstream.get_stream(&self.config.stream_name).await {
            Ok(mut stream) => {
                let stream_info = stream
                    .info()
                    .await
                    .map_err(ConsumerError::from_jetstream_error)?;
                debug!(
                    stream = %self.config.stream_name,
                    messages = stream_info.state.messages,
                    "Stream already exists"
                );
                Ok(())
            }
            Err(_) => {
                info!(
                    stream = %self.config.stream_name,
                    subject = %self.config.subject,
                    "Creating stream"
                );

                self.jetstream
                    .create_stream(JsStreamConfig {
                        name: self.config.stream_name.clone(),
                        subjects: vec![self.config.subject.clone()],
                        max_messages: 100_000,
                        max_age: Duration::from_secs(7 * 24 * 60 * 60), // 7 days
                        ..Default::default()
                    })
                    .await
                    .map_err(ConsumerError::from_jetstream_error)?;

                info!(stream = %self.config.stream_name, "Stream created");
                Ok(())
            }
        }
    }

    /// Ensure the durable pull consumer exists, creating it if necessary.
    ///
    /// The durable name is shared across worker instances; the broker
    /// distributes deliveries among them.
    pub async fn ensure_consumer(
        &self,
    ) -> Result<async_nats::jetstream::consumer::Consumer<PullConfig>, ConsumerError> {
        let stream = self
            .jetstream
            .get_stream(&self.config.stream_name)
            .await
            .map_err(ConsumerError::from_jetstream_error)?;

        match stream
            .get_consumer::<PullConfig>(&self.config.durable_name)
            .await
        {
            Ok(consumer) => {
                debug!(
                    consumer = %self.config.durable_name,
                    "Consumer already exists"
                );
                Ok(consumer)
            }
            Err(_) => {
                info!(
                    consumer = %self.config.durable_name,
                    stream = %self.config.stream_name,
                    max_deliver = self.config.max_deliver,
                    "Creating durable consumer"
                );

                let consumer = stream
                    .create_consumer(PullConfig {
                        durable_name: Some(self.config.durable_name.clone()),
                        name: Some(self.config.durable_name.clone()),
                        ack_policy: AckPolicy::Explicit,
                        ack_wait: self.config.ack_wait,
                        max_deliver: self.config.max_deliver,
                        filter_subject: self.config.subject.clone(),
                        ..Default::default()
                    })
                    .await
                    .map_err(ConsumerError::from_jetstream_error)?;

                info!(consumer = %self.config.durable_name, "Consumer created");
                Ok(consumer)
            }
        }
    }

    /// Initialize stream and consumer.
    pub async fn init(&self) -> Result<(), ConsumerError> {
        self.ensure_stream().await?;
        self.ensure_consumer().await?;
        Ok(())
    }

    /// Fetch a batch of raw messages with broker metadata attached.
    ///
    /// Payloads are not parsed here; the worker decides what a malformed
    /// payload means for the message lifecycle.
    pub async fn fetch(&self) -> Result<Vec<InboundMessage>, ConsumerError> {
        let consumer = self.ensure_consumer().await?;

        let mut messages = consumer
            .fetch()
            .max_messages(self.config.batch_size)
            .expires(self.config.fetch_timeout)
            .messages()
            .await
            .map_err(ConsumerError::from_jetstream_error)?;

        let mut result = Vec::new();

        while let Some(next) = messages.next().await {
            match next {
                Ok(message) => result.push(InboundMessage::from_jetstream(message)),
                Err(e) => {
                    warn!(error = %e, "Error receiving message");
                }
            }
        }

        Ok(result)
    }
}

/// A delivered message plus its broker-assigned metadata.
pub struct InboundMessage {
    message: async_nats::jetstream::Message,
    /// Subject the message arrived on.
    pub subject: String,
    /// Stream the message belongs to.
    pub stream: String,
    /// Sequence within the stream.
    pub stream_sequence: u64,
    /// Sequence within the consumer (delivery sequence).
    pub delivery_sequence: u64,
    /// Resolved delivery count: 1 on first delivery, incremented by the
    /// broker on each redelivery.
    pub delivery_count: i64,
}

impl InboundMessage {
    fn from_jetstream(message: async_nats::jetstream::Message) -> Self {
        let subject = message.subject.to_string();
        let (stream, stream_sequence, delivery_sequence, delivery_count) = match message.info() {
            Ok(meta) => (
                meta.stream.to_string(),
                meta.stream_sequence,
                meta.consumer_sequence,
                resolve_delivery_count(Some(meta.delivered), false),
            ),
            Err(e) => {
                warn!(error = %e, "Failed to parse message info, assuming first delivery");
                (String::new(), 0, 0, resolve_delivery_count(None, false))
            }
        };

        Self {
            message,
            subject,
            stream,
            stream_sequence,
            delivery_sequence,
            delivery_count,
        }
    }

    /// Raw payload bytes.
    pub fn payload(&self) -> &Bytes {
        &self.message.payload
    }

    /// Header map, when the publisher attached one.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.message.headers.as_ref()
    }

    /// First value of a header, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .and_then(|headers| headers.get(name))
            .map(|value| value.as_str())
    }

    /// Whether the broker has delivered this message before.
    pub fn is_redelivery(&self) -> bool {
        self.delivery_count > 1
    }

    /// Acknowledge the message (successful processing).
    pub async fn ack(self) -> Result<(), ConsumerError> {
        self.message
            .ack()
            .await
            .map_err(|e| ConsumerError::consumer_error(e.to_string()))
    }

    /// Negative acknowledge with a delay; the broker redelivers later
    /// with an incremented delivery count.
    pub async fn nak_with_delay(self, delay: Duration) -> Result<(), ConsumerError> {
        self.message
            .ack_with(async_nats::jetstream::AckKind::Nak(Some(delay)))
            .await
            .map_err(|e| ConsumerError::consumer_error(e.to_string()))
    }

    /// Terminate the message; the broker stops redelivering it to this
    /// consumer permanently.
    pub async fn term(self) -> Result<(), ConsumerError> {
        self.message
            .ack_with(async_nats::jetstream::AckKind::Term)
            .await
            .map_err(|e| ConsumerError::consumer_error(e.to_string()))
    }
}
