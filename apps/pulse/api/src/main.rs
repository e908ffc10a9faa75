use axum::middleware;
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre()?;

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    // Install the Prometheus recorder before any handler records a metric
    observability::init_metrics();

    info!("Connecting to Redis at {}", config.redis.uri);
    let redis = database::redis::connect_with_retry(&config.redis.uri, None)
        .await
        .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))?;

    let state = AppState { config, redis };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check with an actual redis health check
    // - /metrics: Prometheus exposition
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()))
        .route(
            "/metrics",
            axum::routing::get(observability::metrics_handler),
        )
        .layer(middleware::from_fn(
            observability::middleware::metrics_middleware,
        ));

    info!("Starting pulse API with production-ready shutdown (30s timeout)");

    // Production-ready server with graceful shutdown and cleanup
    // State moves here for cleanup
    create_production_app(app, &state.config.server, Duration::from_secs(30), {
        let redis = state.redis.clone();
        async move {
            // Redis ConnectionManager closes automatically on drop
            drop(redis);
            info!("Redis connection closed successfully");
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Pulse API shutdown complete");
    Ok(())
}
