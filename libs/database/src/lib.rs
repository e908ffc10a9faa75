//! Database library providing connectors and utilities for Redis
//!
//! This library provides connection management, retry helpers, and health
//! checks for the datastores used by the platform.
//!
//! # Features
//!
//! - `redis` (default) - Redis support
//!
//! # Examples
//!
//! ## Redis
//!
//! ```ignore
//! use database::redis;
//! use redis::AsyncCommands;
//!
//! let mut conn = redis::connect("redis://127.0.0.1:6379").await?;
//! conn.set::<_, _, ()>("key", "value").await?;
//! ```

// Always available modules
pub mod common;

// Database-specific modules (conditional based on features)
#[cfg(feature = "redis")]
pub mod redis;

// Re-exports for convenience
pub use common::{DatabaseError, DatabaseResult};
