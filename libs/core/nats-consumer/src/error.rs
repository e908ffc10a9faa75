//! Error types for the NATS consumer.

use thiserror::Error;

/// Error that can occur in consumer operations.
#[derive(Debug, Error)]
pub enum ConsumerError {
    /// NATS connection error
    #[error("NATS connection error: {0}")]
    Connection(#[from] async_nats::ConnectError),

    /// JetStream error
    #[error("JetStream error: {0}")]
    JetStream(String),

    /// Consumer error (fetch, ack, nak, term)
    #[error("Consumer error: {0}")]
    Consumer(String),

    /// Publish error (dead-letter routing)
    #[error("Publish error: {0}")]
    Publish(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Payload rejected before deserialization (non-UTF-8, not a JSON object)
    #[error("Invalid payload: {0}")]
    Payload(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConsumerError {
    /// Create a JetStream error from an async_nats error.
    ///
    /// The async_nats jetstream errors are distinct per operation, so they
    /// are collapsed into their display text here.
    pub fn from_jetstream_error(error: impl std::fmt::Display) -> Self {
        Self::JetStream(error.to_string())
    }

    /// Create a publish error.
    pub fn publish_error(msg: impl Into<String>) -> Self {
        Self::Publish(msg.into())
    }

    /// Create a consumer error.
    pub fn consumer_error(msg: impl Into<String>) -> Self {
        Self::Consumer(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConsumerError::consumer_error("ack failed");
        assert_eq!(err.to_string(), "Consumer error: ack failed");

        let err = ConsumerError::publish_error("no responders");
        assert_eq!(err.to_string(), "Publish error: no responders");
    }

    #[test]
    fn test_payload_rejection_is_not_a_config_error() {
        let err = ConsumerError::Payload("payload is not a JSON object".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid payload: payload is not a JSON object"
        );
    }

    #[test]
    fn test_serialization_error_conversion() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err: ConsumerError = serde_err.into();
        assert!(matches!(err, ConsumerError::Serialization(_)));
    }
}
