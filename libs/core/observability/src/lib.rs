//! Observability utilities for the fitness event platform.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Custom metrics for webhook normalization and coach tips
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, CoachTipMetrics};
//!
//! // Initialize metrics recorder
//! init_metrics();
//!
//! // Record tip operations
//! CoachTipMetrics::record_tip_generated("safety", "high");
//!
//! // Add metrics endpoint to router
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod coaching;
pub mod middleware;

pub use coaching::CoachTipMetrics;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// This should be called once at application startup.
/// Returns the PrometheusHandle for rendering metrics.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        info!("Prometheus metrics recorder initialized");

        // Register metric descriptions
        register_metric_descriptions();

        handle
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    // HTTP metrics
    describe_counter!(
        "http_requests_total",
        "Total number of HTTP requests"
    );
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Normalization worker metrics
    describe_counter!(
        "normalize_messages_total",
        "Webhook messages processed by the normalize worker, by result"
    );
    describe_counter!(
        "normalize_redeliveries_total",
        "Redelivered webhook messages observed, by delivery attempt"
    );
    describe_counter!(
        "dlq_messages_total",
        "Messages routed to the dead-letter stream, by reason"
    );
    describe_histogram!(
        "normalize_processing_duration_seconds",
        "Webhook processing duration in seconds"
    );

    // Coach tip metrics
    describe_counter!(
        "coach_tips_generated_total",
        "Coach tips generated, by category and priority"
    );
    describe_counter!(
        "coach_tips_cleanup_total",
        "Expired coach tips removed by cleanup runs"
    );
    describe_gauge!(
        "coach_tips_active",
        "Coach tips currently stored and unexpired"
    );
}
