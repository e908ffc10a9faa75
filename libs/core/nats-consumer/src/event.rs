//! Event and processor traits.
//!
//! An [`Event`] is the typed form of a validated message payload; an
//! [`EventProcessor`] turns one event into its downstream effects. The
//! worker owns parsing, classification, and acknowledgement — processors
//! only report success or a failure whose text the classifier can read.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Failure returned by an [`EventProcessor`].
///
/// Carries display text only. Retry policy is decided centrally by the
/// classifier from this text, never by the processor.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ProcessingError(String);

impl ProcessingError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<String> for ProcessingError {
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

/// A typed event parsed from a message payload.
pub trait Event: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Stable identifier for logging and tracing.
    fn event_id(&self) -> String;

    /// Event type name for logging.
    fn event_type(&self) -> &str;
}

/// Processor for one event type.
///
/// # Error Handling
///
/// Return a [`ProcessingError`] whose text reflects the underlying fault.
/// Text containing transient-fault signals (connection refused, timeout,
/// DNS) is retried; schema/validation text dead-letters immediately;
/// everything else dead-letters as non-retryable.
#[async_trait]
pub trait EventProcessor<E: Event>: Send + Sync {
    /// Process a single event.
    async fn process(&self, event: &E) -> Result<(), ProcessingError>;

    /// Processor name, used for logging and the DLQ consumer label.
    fn name(&self) -> &'static str;
}

/// Processor that accepts every event. For tests and wiring checks.
pub struct NoOpProcessor;

#[async_trait]
impl<E: Event> EventProcessor<E> for NoOpProcessor {
    async fn process(&self, _event: &E) -> Result<(), ProcessingError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop_processor"
    }
}

/// Processor that fails every event with a fixed error text. For tests.
pub struct FailingProcessor {
    error_text: String,
}

impl FailingProcessor {
    pub fn new(error_text: impl Into<String>) -> Self {
        Self {
            error_text: error_text.into(),
        }
    }
}

#[async_trait]
impl<E: Event> EventProcessor<E> for FailingProcessor {
    async fn process(&self, _event: &E) -> Result<(), ProcessingError> {
        Err(ProcessingError::new(self.error_text.clone()))
    }

    fn name(&self) -> &'static str {
        "failing_processor"
    }
}
