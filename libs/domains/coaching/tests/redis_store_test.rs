//! RedisTipStore integration tests against a real Redis container.
//!
//! Run with `cargo test -- --ignored` (requires Docker).

use chrono::{Duration, Utc};
use domain_coaching::{
    CoachTip, RedisTipStore, ScoringSnapshot, TipAction, TipCategory, TipPriority, TipStore,
};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use test_utils::TestRedis;

async fn store_for(redis: &TestRedis) -> (RedisTipStore, ConnectionManager) {
    let manager = redis.connection_manager().await;
    (RedisTipStore::new(manager.clone()), manager)
}

fn tip(id: &str, plan_id: &str, user_id: &str, expires_in: Duration) -> CoachTip {
    let now = Utc::now();
    CoachTip {
        id: id.to_string(),
        plan_id: plan_id.to_string(),
        user_id: user_id.to_string(),
        category: TipCategory::Safety,
        priority: TipPriority::High,
        message: "Review your form".to_string(),
        action: TipAction {
            action_type: "review_safety".to_string(),
            data: serde_json::json!({"score": 60.0}),
        },
        scoring: ScoringSnapshot {
            total: 70.0,
            safety: 60.0,
            compliance: 90.0,
            performance: 80.0,
        },
        generated_at: now,
        expires_at: now + expires_in,
    }
}

#[tokio::test]
#[ignore]
async fn test_round_trip_sets_key_ttls() {
    let redis = TestRedis::new().await;
    let (store, mut conn) = store_for(&redis).await;

    store
        .store(tip("tip-1", "plan-1", "user-1", Duration::seconds(3600)))
        .await
        .unwrap();

    let stored = store.get_by_id("tip-1").await.unwrap().unwrap();
    assert_eq!(stored.tip.plan_id, "plan-1");

    let by_plan = store.get_by_plan("plan-1").await.unwrap().unwrap();
    assert_eq!(by_plan.tip.id, "tip-1");

    // Both keys carry a TTL close to the remaining lifetime.
    let tip_ttl: i64 = conn.ttl("coach_tips:tip:tip-1").await.unwrap();
    let plan_ttl: i64 = conn.ttl("coach_tips:plan:plan-1").await.unwrap();
    assert!(tip_ttl > 3500 && tip_ttl <= 3600);
    assert!(plan_ttl > 3500 && plan_ttl <= 3600);
}

#[tokio::test]
#[ignore]
async fn test_expired_tip_deleted_on_read() {
    let redis = TestRedis::new().await;
    let (store, mut conn) = store_for(&redis).await;

    // Already past expiry: stored without key TTL, caught by lazy expiry.
    store
        .store(tip("tip-1", "plan-1", "user-1", Duration::seconds(-10)))
        .await
        .unwrap();

    assert!(store.get_by_id("tip-1").await.unwrap().is_none());

    let tip_exists: bool = conn.exists("coach_tips:tip:tip-1").await.unwrap();
    let plan_exists: bool = conn.exists("coach_tips:plan:plan-1").await.unwrap();
    assert!(!tip_exists);
    assert!(!plan_exists);
}

#[tokio::test]
#[ignore]
async fn test_overwrite_wins_and_owner_scan() {
    let redis = TestRedis::new().await;
    let (store, _conn) = store_for(&redis).await;

    store
        .store(tip("tip-1", "plan-1", "user-1", Duration::seconds(3600)))
        .await
        .unwrap();
    store
        .store(tip("tip-2", "plan-1", "user-1", Duration::seconds(3600)))
        .await
        .unwrap();
    store
        .store(tip("tip-3", "plan-2", "user-2", Duration::seconds(3600)))
        .await
        .unwrap();

    let by_plan = store.get_by_plan("plan-1").await.unwrap().unwrap();
    assert_eq!(by_plan.tip.id, "tip-2");

    let user_tips = store.get_all_by_owner("user-1").await.unwrap();
    assert_eq!(user_tips.len(), 2);

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_tips, 3);
}

#[tokio::test]
#[ignore]
async fn test_cleanup_sweeps_expired() {
    let redis = TestRedis::new().await;
    let (store, _conn) = store_for(&redis).await;

    store
        .store(tip("tip-1", "plan-1", "user-1", Duration::seconds(-10)))
        .await
        .unwrap();
    store
        .store(tip("tip-2", "plan-2", "user-1", Duration::seconds(3600)))
        .await
        .unwrap();

    let cleaned = store.cleanup_expired().await.unwrap();
    assert_eq!(cleaned, 1);

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_tips, 1);
    assert_eq!(stats.expired_tips, 0);
}
