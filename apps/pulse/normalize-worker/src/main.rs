//! Webhook Normalization Worker
//!
//! Binary entry point for the NATS-based normalize worker.

#[tokio::main]
async fn main() {
    if let Err(e) = pulse_normalize_worker::run().await {
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}
