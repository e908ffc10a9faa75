//! Handler tests for the coaching domain.
//!
//! These exercise HTTP status codes, error bodies, and response
//! serialization against the in-memory store, without a real Redis.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use domain_coaching::*;
use http_body_util::BodyExt;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_tip(id: &str, plan_id: &str, user_id: &str) -> CoachTip {
    let now = Utc::now();
    CoachTip {
        id: id.to_string(),
        plan_id: plan_id.to_string(),
        user_id: user_id.to_string(),
        category: TipCategory::Compliance,
        priority: TipPriority::High,
        message: "Adjust your schedule".to_string(),
        action: TipAction {
            action_type: "adjust_schedule".to_string(),
            data: serde_json::json!({"score": 45.0}),
        },
        scoring: ScoringSnapshot {
            total: 70.0,
            safety: 95.0,
            compliance: 45.0,
            performance: 70.0,
        },
        generated_at: now,
        expires_at: now + Duration::days(7),
    }
}

async fn app_with_tips(tips: Vec<CoachTip>) -> axum::Router {
    let store = MemoryTipStore::new();
    for tip in tips {
        store.store(tip).await.unwrap();
    }
    handlers::router(TipService::new(store))
}

#[tokio::test]
async fn test_get_plan_tip_returns_200() {
    let app = app_with_tips(vec![sample_tip("tip-1", "plan-1", "user-1")]).await;

    let request = Request::builder()
        .uri("/plans/plan-1/coach-tip")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let tip: StoredCoachTip = json_body(response.into_body()).await;
    assert_eq!(tip.tip.id, "tip-1");
    assert_eq!(tip.tip.category, TipCategory::Compliance);
}

#[tokio::test]
async fn test_missing_plan_tip_returns_404_tip_not_found() {
    let app = app_with_tips(vec![]).await;

    let request = Request::builder()
        .uri("/plans/plan-9/coach-tip")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "tip_not_found");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_get_tip_by_id() {
    let app = app_with_tips(vec![sample_tip("tip-1", "plan-1", "user-1")]).await;

    let request = Request::builder()
        .uri("/coach-tips/tip-1")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let tip: StoredCoachTip = json_body(response.into_body()).await;
    assert_eq!(tip.tip.plan_id, "plan-1");
}

#[tokio::test]
async fn test_list_user_tips_empty_is_200() {
    let app = app_with_tips(vec![sample_tip("tip-1", "plan-1", "user-1")]).await;

    let request = Request::builder()
        .uri("/users/user-2/coach-tips")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let tips: Vec<StoredCoachTip> = json_body(response.into_body()).await;
    assert!(tips.is_empty());
}

#[tokio::test]
async fn test_stats_endpoint() {
    let app = app_with_tips(vec![
        sample_tip("tip-1", "plan-1", "user-1"),
        sample_tip("tip-2", "plan-2", "user-1"),
    ])
    .await;

    let request = Request::builder()
        .uri("/coach-tips/stats")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stats: TipStats = json_body(response.into_body()).await;
    assert_eq!(stats.total_tips, 2);
    assert_eq!(stats.active_tips, 2);
    assert_eq!(stats.expired_tips, 0);
}

#[tokio::test]
async fn test_cleanup_endpoint() {
    let mut expired = sample_tip("tip-1", "plan-1", "user-1");
    expired.expires_at = Utc::now() - Duration::hours(1);
    let app = app_with_tips(vec![expired, sample_tip("tip-2", "plan-2", "user-1")]).await;

    let request = Request::builder()
        .method("POST")
        .uri("/coach-tips/cleanup")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: CleanupResult = json_body(response.into_body()).await;
    assert_eq!(result.cleaned_count, 1);
}
