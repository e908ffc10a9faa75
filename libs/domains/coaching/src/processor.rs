//! Webhook event processor: generate a tip, cache it.

use crate::events::WebhookEvent;
use crate::generator::generate_tip;
use crate::store::TipStore;
use async_trait::async_trait;
use nats_consumer::{EventProcessor, ProcessingError};
use observability::CoachTipMetrics;
use tracing::{debug, info};

/// Processor turning scored webhook events into stored coach tips.
///
/// The cache policy is explicit here: generate, then store under the plan
/// index (overwrite-wins). Events without a scoring snapshot are accepted
/// and produce nothing.
pub struct WebhookProcessor<S: TipStore> {
    store: S,
}

impl<S: TipStore> WebhookProcessor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: TipStore> EventProcessor<WebhookEvent> for WebhookProcessor<S> {
    async fn process(&self, event: &WebhookEvent) -> Result<(), ProcessingError> {
        let Some(tip) = generate_tip(event) else {
            debug!(
                event_id = %event.event_id,
                plan_id = %event.plan_id,
                "Event carries no scoring snapshot, no tip generated"
            );
            return Ok(());
        };

        let category = tip.category.to_string();
        let priority = tip.priority.to_string();
        let tip_id = tip.id.clone();

        self.store
            .store(tip)
            .await
            .map_err(|e| ProcessingError::new(e.to_string()))?;

        CoachTipMetrics::record_tip_generated(&category, &priority);

        info!(
            event_id = %event.event_id,
            plan_id = %event.plan_id,
            tip_id = %tip_id,
            category = %category,
            priority = %priority,
            "Coach tip generated and stored"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "webhook_processor"
    }
}
