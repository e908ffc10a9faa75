//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestRedis`: Redis container with automatic cleanup (feature: "redis")
//! - `TestNats`: NATS container with JetStream enabled (feature: "nats")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Features
//!
//! - `redis` (default): Enables Redis test infrastructure
//! - `nats` (default): Enables NATS test infrastructure
//! - `all`: Enables everything
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestRedis, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_redis_test() {
//!     let redis = TestRedis::new().await;
//!     let manager = redis.connection_manager().await;
//!
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!     let plan_id = builder.plan_id();
//! }
//! ```

use uuid::Uuid;

// Conditionally compile container modules based on features
#[cfg(feature = "nats")]
mod nats;

#[cfg(feature = "redis")]
mod redis;

// Re-export based on enabled features
#[cfg(feature = "nats")]
pub use nats::TestNats;

#[cfg(feature = "redis")]
pub use redis::TestRedis;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test data.
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    fn seeded_uuid(&self, salt: u64) -> Uuid {
        let bytes = (self.seed ^ salt).to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Generate a deterministic user ID for testing
    pub fn user_id(&self) -> String {
        self.seeded_uuid(0x75736572).to_string()
    }

    /// Generate a deterministic plan ID for testing
    pub fn plan_id(&self) -> String {
        self.seeded_uuid(0x706c616e).to_string()
    }

    /// Generate a deterministic event ID for testing
    pub fn event_id(&self) -> String {
        self.seeded_uuid(0x65766e74).to_string()
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("stream", "main");
    /// // Returns: "test-stream-12345-main"
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a string contains a substring with a nice error message
    pub fn assert_contains(haystack: &str, needle: &str, context: &str) {
        assert!(
            haystack.contains(needle),
            "{}: expected {:?} to contain {:?}",
            context,
            haystack,
            needle
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.user_id(), builder2.user_id());
        assert_eq!(builder1.plan_id(), builder2.plan_id());
        assert_eq!(
            builder1.name("stream", "test"),
            builder2.name("stream", "test")
        );
    }

    #[test]
    fn test_data_builder_ids_differ_by_kind() {
        let builder = TestDataBuilder::from_test_name("my_test");

        assert_ne!(builder.user_id(), builder.plan_id());
        assert_ne!(builder.plan_id(), builder.event_id());
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        // Different test names should generate different data
        assert_ne!(builder1.user_id(), builder2.user_id());
    }
}
