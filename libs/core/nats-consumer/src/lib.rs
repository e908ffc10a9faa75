//! NATS JetStream consumer framework for at-least-once event processing.
//!
//! This library provides a durable pull-consumer loop with explicit acks,
//! bounded redelivery, and dead-letter routing. Failure handling is a pure
//! decision: every processing error is classified from its text and resolved
//! through a single decision function, so the ack/nak/term behavior can be
//! tested without a broker.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌─────────────────────┐     ┌────────────────┐
//! │   Publisher    │────▶│   NATS JetStream    │────▶│  EventWorker   │
//! │  (vendors)     │     │  (Durable Stream)   │     │ (pull + ack)   │
//! └────────────────┘     └─────────────────────┘     └────────────────┘
//!                                  │                         │
//!                                  ▼                         ▼
//!                        ┌─────────────────┐        ┌────────────────┐
//!                        │   DLQ Stream    │        │ EventProcessor │
//!                        │ (by reason)     │        │  (Your Logic)  │
//!                        └─────────────────┘        └────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **JetStream Consumers**: Pull-based durable consumers, explicit acks
//! - **Bounded Redelivery**: Fixed-delay naks up to a delivery ceiling
//! - **Dead Letter Routing**: Terminal failures published to `<base>.<reason>`
//! - **Per-Message Spans**: W3C trace context propagated from headers
//! - **Prometheus Metrics**: Outcome counters, redelivery counts, latency
//! - **Graceful Shutdown**: Watch-channel signal drains in-flight work
//!
//! # Example
//!
//! ```rust,ignore
//! use nats_consumer::{ConsumerConfig, EventWorker, StreamConfig};
//!
//! // Define your stream
//! struct WebhookStream;
//! impl StreamConfig for WebhookStream {
//!     const STREAM_NAME: &'static str = "VENDOR_WEBHOOKS";
//!     const DURABLE_NAME: &'static str = "normalize-worker";
//!     const SUBJECT: &'static str = "vendor.*.webhook.received";
//!     const DLQ_STREAM: &'static str = "WEBHOOKS_DLQ";
//!     const DLQ_SUBJECT_BASE: &'static str = "dlq.vendor.webhook";
//! }
//!
//! // Create worker
//! let worker = EventWorker::new(
//!     jetstream,
//!     processor,
//!     ConsumerConfig::from_stream::<WebhookStream>(),
//! ).await?;
//!
//! // Run with graceful shutdown
//! worker.run(shutdown_rx).await?;
//! ```

pub mod classifier;
mod config;
mod consumer;
mod dlq;
mod error;
pub mod event;
mod health;
pub mod metrics;
pub mod outcome;
pub mod telemetry;
mod worker;

pub use classifier::{classify, ClassificationResult, FailureReason};
pub use config::{ConsumerConfig, StreamConfig};
pub use consumer::{InboundMessage, StreamConsumer};
pub use dlq::{dlq_subject, DlqRouter, SOURCE_SUBJECT_HEADER};
pub use error::ConsumerError;
pub use event::{Event, EventProcessor, FailingProcessor, NoOpProcessor, ProcessingError};
pub use health::{HealthServer, HealthState, HealthStatus};
pub use metrics::ConsumerMetrics;
pub use outcome::{
    decide, resolve_delivery_count, DlqReason, ProcessingOutcome, RedeliveryPolicy,
};
pub use worker::EventWorker;
