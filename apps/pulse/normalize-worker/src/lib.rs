//! Webhook Normalization Worker (NATS JetStream)
//!
//! A background worker that consumes vendor webhook events and turns
//! scored ones into cached coach tips.
//!
//! ## Architecture
//!
//! ```text
//! NATS JetStream (VENDOR_WEBHOOKS stream)
//!   ↓ (Pull Consumer: normalize-worker)
//! EventWorker<WebhookEvent, WebhookProcessor>
//!   ↓ (generates tips)
//! RedisTipStore (TTL-keyed, plan-indexed)
//! ```
//!
//! ## Features
//!
//! - NATS JetStream for durable at-least-once consumption
//! - Pull-based consumer with ack/nak/term semantics
//! - Bounded redelivery with fixed-delay naks
//! - Dead letter stream for poison messages
//! - Graceful shutdown handling
//! - Health check endpoints for Kubernetes probes
//! - Prometheus metrics

pub mod config;

use config::WorkerSettings;
use core_config::nats::NatsConfig;
use core_config::redis::RedisConfig;
use core_config::{app_info, Environment, FromEnv};
use domain_coaching::{RedisTipStore, WebhookEvent, WebhookProcessor, WebhookStream};
use eyre::{Result, WrapErr};
use nats_consumer::{ConsumerConfig, EventWorker, HealthServer};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

/// Run the normalize worker
///
/// This is the main entry point. It:
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Connects to NATS with JetStream and to Redis
/// 3. Provisions the inbound stream, durable consumer, and DLQ stream
/// 4. Runs the worker loop with graceful shutdown handling
///
/// # Errors
///
/// Returns an error if:
/// - NATS or Redis connection fails
/// - JetStream is not available
/// - Stream/consumer provisioning fails
/// - The worker encounters a fatal error
pub async fn run() -> Result<()> {
    // Initialize tracing (env-aware: JSON for prod, pretty for dev)
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);
    core_config::tracing::install_color_eyre()?;

    // Initialize Prometheus metrics
    let metrics_handle = observability::init_metrics();

    // App info
    let app_info = app_info!();

    info!(
        name = %app_info.name,
        version = %app_info.version,
        "Starting webhook normalize worker"
    );
    info!("Environment: {:?}", environment);

    let settings = WorkerSettings::from_env();
    let nats_config = NatsConfig::from_env()?;
    let redis_config = RedisConfig::from_env()?;

    // Connect to NATS
    info!(url = %nats_config.url, "Connecting to NATS...");
    let nats_client = async_nats::connect(&nats_config.url)
        .await
        .wrap_err_with(|| format!("Failed to connect to NATS at {}", nats_config.url))?;
    info!("Connected to NATS successfully");

    // Create JetStream context
    let jetstream = async_nats::jetstream::new(nats_client);

    // Connect to Redis. The worker runs under orchestration and has no user
    // waiting on it, so it can afford a longer startup retry window.
    info!("Connecting to Redis...");
    let retry = database::common::RetryConfig::new()
        .with_max_retries(5)
        .with_initial_delay(500);
    let redis = database::redis::connect_with_retry(&redis_config.uri, Some(retry))
        .await
        .wrap_err("Failed to connect to Redis")?;
    info!("Connected to Redis successfully");

    // Consumer configuration from the stream definition, plus env overrides
    let consumer_config = settings.apply(ConsumerConfig::from_stream::<WebhookStream>());

    info!(
        stream = %consumer_config.stream_name,
        durable = %consumer_config.durable_name,
        subject = %consumer_config.subject,
        max_deliver = consumer_config.max_deliver,
        "Worker configuration loaded"
    );

    // Set up a shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn shutdown signal handler
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    // Start health server in background
    let health_server = HealthServer::new(settings.health_port).with_metrics(metrics_handle.clone());
    tokio::spawn(async move {
        if let Err(e) = health_server.run().await {
            error!(error = %e, "Health server failed");
        }
    });

    // Build the processing pipeline and run
    let processor = WebhookProcessor::new(RedisTipStore::new(redis));
    let worker = EventWorker::<WebhookEvent, _>::new(jetstream, processor, consumer_config)
        .await
        .wrap_err("Failed to create event worker")?;

    info!("Event worker created, starting processing...");
    worker
        .run(shutdown_rx)
        .await
        .map_err(|e| eyre::eyre!("{}", e))?;

    info!("Webhook normalize worker stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!(error = %e, "Failed to install signal handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        },
    }
}
