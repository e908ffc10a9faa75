//! JetStream worker loop for processing events.

use crate::classifier::classify;
use crate::config::ConsumerConfig;
use crate::consumer::{InboundMessage, StreamConsumer};
use crate::dlq::DlqRouter;
use crate::error::ConsumerError;
use crate::event::{Event, EventProcessor};
use crate::metrics::ConsumerMetrics;
use crate::outcome::{decide, DlqReason, ProcessingOutcome};
use crate::telemetry::{message_span, record_outcome};
use async_nats::jetstream::Context;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, error, info, warn, Instrument};

/// JetStream worker driving one durable consumer.
///
/// Fetches batches, deserializes payloads, runs the processor under a
/// timeout, and resolves each attempt through [`decide`]: ack on success,
/// nak with a fixed delay on retryable failure, term plus dead-letter
/// publish otherwise.
pub struct EventWorker<E: Event, P: EventProcessor<E>> {
    consumer: StreamConsumer,
    dlq: DlqRouter,
    processor: Arc<P>,
    config: ConsumerConfig,
    metrics: ConsumerMetrics,
    _marker: std::marker::PhantomData<E>,
}

impl<E: Event, P: EventProcessor<E>> EventWorker<E, P> {
    /// Create a new worker and provision its streams.
    pub async fn new(
        jetstream: Context,
        processor: P,
        config: ConsumerConfig,
    ) -> Result<Self, ConsumerError> {
        let jetstream = Arc::new(jetstream);
        let processor_name = processor.name();

        let consumer = StreamConsumer::new(jetstream.clone(), config.clone());
        let dlq = DlqRouter::new(
            jetstream.clone(),
            &config.dlq_stream,
            &config.dlq_subject_base,
            &config.durable_name,
        );
        let metrics = ConsumerMetrics::new(&config.subject, &config.durable_name);

        // Initialize stream and consumer
        consumer.init().await?;

        // Initialize DLQ stream
        dlq.ensure_stream().await?;

        info!(
            stream = %config.stream_name,
            durable = %config.durable_name,
            processor = processor_name,
            "Worker initialized"
        );

        Ok(Self {
            consumer,
            dlq,
            processor: Arc::new(processor),
            config,
            metrics,
            _marker: std::marker::PhantomData,
        })
    }

    /// Run the worker loop.
    ///
    /// The worker will:
    /// 1. Fetch messages in batches
    /// 2. Process each message inside its own span
    /// 3. Ack on success, nak with delay on retryable failure, term + DLQ otherwise
    /// 4. Handle shutdown gracefully
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), ConsumerError> {
        info!(
            stream = %self.config.stream_name,
            durable = %self.config.durable_name,
            subject = %self.config.subject,
            "Starting worker"
        );

        loop {
            tokio::select! {
                // Check for shutdown
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping worker");
                        break;
                    }
                }

                // Main processing loop
                result = self.process_batch() => {
                    if let Err(e) = result {
                        error!(error = %e, "Error processing batch");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }

        info!("Worker stopped");
        Ok(())
    }

    /// Process a batch of messages.
    async fn process_batch(&self) -> Result<(), ConsumerError> {
        let messages = self.consumer.fetch().await?;

        if messages.is_empty() {
            // No messages, wait before next poll
            tokio::time::sleep(Duration::from_millis(100)).await;
            return Ok(());
        }

        for message in messages {
            self.process_message(message).await?;
        }

        Ok(())
    }

    /// Process a single message.
    async fn process_message(&self, message: InboundMessage) -> Result<(), ConsumerError> {
        let span = message_span(&message);

        async {
            if message.is_redelivery() {
                debug!(
                    delivery_count = message.delivery_count,
                    "Processing redelivered message"
                );
            }

            let outcome = self.attempt(&message).await;
            record_outcome(&span, &outcome);

            self.apply_outcome(message, outcome).await
        }
        .instrument(span.clone())
        .await
    }

    /// Run one processing attempt and resolve it to an outcome.
    async fn attempt(&self, message: &InboundMessage) -> ProcessingOutcome {
        let event = match self.parse_payload(message) {
            Ok(event) => event,
            Err(e) => {
                // Malformed payloads can never succeed on redelivery.
                warn!(error = %e, "Payload rejected, dead-lettering");
                return ProcessingOutcome::DeadLetter(DlqReason::SchemaInvalid);
            }
        };

        let start = Instant::now();
        let result = tokio::time::timeout(
            self.config.process_timeout,
            self.processor.process(&event),
        )
        .await;
        self.metrics.processing_duration(start.elapsed());

        let error_text = match result {
            Ok(Ok(())) => return ProcessingOutcome::Ack,
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!(
                "processing timed out after {:?}",
                self.config.process_timeout
            ),
        };

        let classification = classify(&error_text);
        let outcome = decide(message.delivery_count, classification, &self.config.policy());

        warn!(
            event_id = %event.event_id(),
            event_type = event.event_type(),
            error = %error_text,
            retryable = classification.retryable,
            delivery_count = message.delivery_count,
            "Processing failed"
        );

        outcome
    }

    /// Deserialize the payload into the event type.
    ///
    /// Anything that is not a JSON object fails fast, matching publishers
    /// that only ever send object envelopes.
    fn parse_payload(&self, message: &InboundMessage) -> Result<E, ConsumerError> {
        let text = std::str::from_utf8(message.payload())
            .map_err(|e| ConsumerError::Payload(format!("payload is not valid UTF-8: {}", e)))?;

        if !text.trim_start().starts_with('{') {
            return Err(ConsumerError::Payload(
                "payload is not a JSON object".to_string(),
            ));
        }

        Ok(serde_json::from_str(text)?)
    }

    /// Apply the resolved outcome to the message.
    async fn apply_outcome(
        &self,
        message: InboundMessage,
        outcome: ProcessingOutcome,
    ) -> Result<(), ConsumerError> {
        match outcome {
            ProcessingOutcome::Ack => {
                message.ack().await?;
                self.metrics.message_success();
            }
            ProcessingOutcome::RetryWithDelay(delay_ms) => {
                let attempt = message.delivery_count;
                message.nak_with_delay(Duration::from_millis(delay_ms)).await?;
                self.metrics.message_retry(attempt);

                debug!(
                    attempt = attempt,
                    delay_ms = delay_ms,
                    "Message scheduled for redelivery"
                );
            }
            ProcessingOutcome::DeadLetter(reason) => {
                // Best effort: a failed DLQ publish must not block the term,
                // or the message would redeliver past its terminal decision.
                if let Err(e) = self.dlq.publish(&message, reason).await {
                    error!(
                        error = %e,
                        reason = %reason,
                        subject = %message.subject,
                        "dlq_publish_failure"
                    );
                }

                message.term().await?;
                self.metrics.message_dlq();
            }
        }

        Ok(())
    }
}
