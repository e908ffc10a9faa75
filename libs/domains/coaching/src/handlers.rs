//! HTTP retrieval surface over the tip store.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CoachingResult;
use crate::models::{
    CleanupResult, CoachTip, ScoringSnapshot, StoredCoachTip, TipAction, TipCategory,
    TipPriority, TipStats,
};
use crate::service::TipService;
use crate::store::TipStore;

/// Get the live coach tip for a plan
#[utoipa::path(
    get,
    path = "/plans/{id}/coach-tip",
    tag = "coach-tips",
    params(
        ("id" = String, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Coach tip for the plan", body = StoredCoachTip),
        (status = 404, description = "No live tip for this plan"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_plan_tip<S: TipStore>(
    State(service): State<Arc<TipService<S>>>,
    Path(id): Path<String>,
) -> CoachingResult<Json<StoredCoachTip>> {
    let tip = service.get_tip_for_plan(&id).await?;
    Ok(Json(tip))
}

/// Get a coach tip by ID
#[utoipa::path(
    get,
    path = "/coach-tips/{tipId}",
    tag = "coach-tips",
    params(
        ("tipId" = String, Path, description = "Tip ID")
    ),
    responses(
        (status = 200, description = "Coach tip found", body = StoredCoachTip),
        (status = 404, description = "Tip not found or expired"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_tip<S: TipStore>(
    State(service): State<Arc<TipService<S>>>,
    Path(tip_id): Path<String>,
) -> CoachingResult<Json<StoredCoachTip>> {
    let tip = service.get_tip(&tip_id).await?;
    Ok(Json(tip))
}

/// List all live coach tips for a user
#[utoipa::path(
    get,
    path = "/users/{userId}/coach-tips",
    tag = "coach-tips",
    params(
        ("userId" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Tips for the user, newest first", body = Vec<StoredCoachTip>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_user_tips<S: TipStore>(
    State(service): State<Arc<TipService<S>>>,
    Path(user_id): Path<String>,
) -> CoachingResult<Json<Vec<StoredCoachTip>>> {
    let tips = service.list_tips_for_user(&user_id).await?;
    Ok(Json(tips))
}

/// Store-wide tip counts
#[utoipa::path(
    get,
    path = "/coach-tips/stats",
    tag = "coach-tips",
    responses(
        (status = 200, description = "Tip store statistics", body = TipStats),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_stats<S: TipStore>(
    State(service): State<Arc<TipService<S>>>,
) -> CoachingResult<Json<TipStats>> {
    let stats = service.stats().await?;
    Ok(Json(stats))
}

/// Sweep expired tips
#[utoipa::path(
    post,
    path = "/coach-tips/cleanup",
    tag = "coach-tips",
    responses(
        (status = 200, description = "Cleanup completed", body = CleanupResult),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn cleanup<S: TipStore>(
    State(service): State<Arc<TipService<S>>>,
) -> CoachingResult<Json<CleanupResult>> {
    let result = service.cleanup().await?;
    observability::CoachTipMetrics::record_cleanup_completed(result.cleaned_count);
    Ok(Json(result))
}

/// OpenAPI documentation for the coach-tips API
#[derive(OpenApi)]
#[openapi(
    paths(
        get_plan_tip,
        get_tip,
        list_user_tips,
        get_stats,
        cleanup,
    ),
    components(
        schemas(CoachTip, StoredCoachTip, TipAction, TipCategory, TipPriority, ScoringSnapshot, TipStats, CleanupResult)
    ),
    tags(
        (name = "coach-tips", description = "Coach tip retrieval and maintenance")
    )
)]
pub struct CoachTipsApiDoc;

/// Create the coach-tips router
pub fn router<S: TipStore + 'static>(service: TipService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/plans/{id}/coach-tip", get(get_plan_tip))
        .route("/coach-tips/stats", get(get_stats))
        .route("/coach-tips/cleanup", post(cleanup))
        .route("/coach-tips/{tipId}", get(get_tip))
        .route("/users/{userId}/coach-tips", get(list_user_tips))
        .with_state(shared_service)
}
