use std::sync::Arc;
use tracing::instrument;

use crate::error::{CoachingError, CoachingResult};
use crate::models::{CleanupResult, StoredCoachTip, TipStats};
use crate::store::TipStore;

/// Service layer over the tip store
#[derive(Clone)]
pub struct TipService<S: TipStore> {
    store: Arc<S>,
}

impl<S: TipStore> TipService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Get the live tip for a plan
    #[instrument(skip(self), fields(plan_id = %plan_id))]
    pub async fn get_tip_for_plan(&self, plan_id: &str) -> CoachingResult<StoredCoachTip> {
        self.store
            .get_by_plan(plan_id)
            .await?
            .ok_or_else(|| CoachingError::TipNotFound(format!("for plan {}", plan_id)))
    }

    /// Get a tip by its id
    #[instrument(skip(self), fields(tip_id = %id))]
    pub async fn get_tip(&self, id: &str) -> CoachingResult<StoredCoachTip> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoachingError::TipNotFound(id.to_string()))
    }

    /// Delete a tip
    #[instrument(skip(self), fields(tip_id = %id, plan_id = %plan_id))]
    pub async fn delete_tip(&self, id: &str, plan_id: &str) -> CoachingResult<()> {
        self.store.delete(id, plan_id).await?;
        Ok(())
    }

    /// All live tips for a user, newest first
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_tips_for_user(&self, user_id: &str) -> CoachingResult<Vec<StoredCoachTip>> {
        Ok(self.store.get_all_by_owner(user_id).await?)
    }

    /// Sweep expired tips
    #[instrument(skip(self))]
    pub async fn cleanup(&self) -> CoachingResult<CleanupResult> {
        let cleaned_count = self.store.cleanup_expired().await?;
        Ok(CleanupResult {
            cleaned_count,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Store-wide counts
    pub async fn stats(&self) -> CoachingResult<TipStats> {
        Ok(self.store.stats().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockTipStore;

    #[tokio::test]
    async fn test_missing_plan_tip_maps_to_not_found() {
        let mut store = MockTipStore::new();
        store
            .expect_get_by_plan()
            .returning(|_| Ok(None));

        let service = TipService::new(store);
        let err = service.get_tip_for_plan("plan-1").await.unwrap_err();

        assert!(matches!(err, CoachingError::TipNotFound(_)));
    }
}
