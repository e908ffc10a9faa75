use crate::Environment;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install color-eyre panic and error report handlers.
///
/// Call once at startup, before any errors can occur.
pub fn install_color_eyre() -> Result<(), color_eyre::Report> {
    color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install()
}

/// Initialize the global tracing subscriber.
///
/// Respects RUST_LOG when set. Otherwise defaults to "info" in production
/// and "debug" in development. Production output is flattened JSON for log
/// aggregation; development output is human-readable.
pub fn init_tracing(environment: &Environment) {
    let default_filter = match environment {
        Environment::Production => "info",
        Environment::Development => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());

    let result = if environment.is_production() {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init()
    };

    match result {
        Ok(()) => {}
        Err(_) => {
            // Already initialized. Happens when tests share a process.
        }
    }
}
