//! Coaching Domain
//!
//! Turns scored vendor webhook events into cached coach tips and serves
//! them over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │  Processor  │     │  Handlers   │  ← HTTP retrieval surface
//! └──────┬──────┘     └──────┬──────┘
//!        │ generate          │
//! ┌──────▼──────┐     ┌──────▼──────┐
//! │  Generator  │     │   Service   │  ← Business logic
//! └──────┬──────┘     └──────┬──────┘
//!        │ store             │
//!        └─────────┬─────────┘
//!           ┌──────▼──────┐
//!           │  TipStore   │  ← Trait + Redis / in-memory impls
//!           └─────────────┘
//! ```
//!
//! Tips are immutable, TTL-bound (7 days), and indexed by their parent
//! plan with overwrite-wins semantics.

pub mod error;
pub mod events;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod processor;
pub mod service;
pub mod store;
pub mod streams;

// Re-export commonly used types
pub use error::{CoachingError, CoachingResult};
pub use events::WebhookEvent;
pub use generator::{generate_tip, generate_tip_at};
pub use handlers::CoachTipsApiDoc;
pub use models::{
    CleanupResult, CoachTip, ScoringSnapshot, StoredCoachTip, TipAction, TipCategory,
    TipPriority, TipStats,
};
pub use processor::WebhookProcessor;
pub use service::TipService;
pub use store::{MemoryTipStore, RedisTipStore, TipStore, TipStoreError};
pub use streams::WebhookStream;
