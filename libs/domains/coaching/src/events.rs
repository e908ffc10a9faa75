//! Inbound webhook event payload.

use crate::models::ScoringSnapshot;
use chrono::{DateTime, Utc};
use nats_consumer::Event;
use serde::{Deserialize, Serialize};

/// A vendor webhook event as published on `vendor.<vendor>.webhook.received`.
///
/// `plan_id` and `user_id` are required; a payload missing either fails
/// deserialization and dead-letters as schema-invalid. `scoring` is
/// optional — events without it produce no tip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub event_id: String,
    pub event_type: String,
    pub vendor: String,
    pub user_id: String,
    pub plan_id: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub scoring: Option<ScoringSnapshot>,
}

impl Event for WebhookEvent {
    fn event_id(&self) -> String {
        self.event_id.clone()
    }

    fn event_type(&self) -> &str {
        &self.event_type
    }
}
