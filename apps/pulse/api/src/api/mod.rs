use axum::Router;
use domain_coaching::{RedisTipStore, TipService};

pub mod health;

/// Creates the API routes with state already applied.
///
/// The coach-tips router carries its own full paths
/// (/plans/{id}/coach-tip, /coach-tips/..., /users/{userId}/coach-tips),
/// so it is merged rather than nested under a prefix.
pub fn routes(state: &crate::state::AppState) -> Router {
    let store = RedisTipStore::new(state.redis.clone());
    let service = TipService::new(store);

    Router::new().merge(domain_coaching::handlers::router(service))
}

/// Creates a router with the /ready endpoint that performs actual redis checks.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
