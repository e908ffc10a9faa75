//! Worker-specific tuning knobs, read from the environment.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Port for the health/metrics server
    pub health_port: u16,

    /// Override for the durable consumer name
    pub durable_name: Option<String>,

    /// Deliveries before dead-lettering
    pub max_deliver: Option<i64>,

    /// Ack wait before the broker redelivers an unacked message
    pub ack_wait: Option<Duration>,

    /// Fetch batch size
    pub batch_size: Option<usize>,

    /// Bound on a single processing attempt
    pub process_timeout: Option<Duration>,
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

impl WorkerSettings {
    pub fn from_env() -> Self {
        Self {
            health_port: env::var("NORMALIZE_HEALTH_PORT")
                .or_else(|_| env::var("HEALTH_PORT"))
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
            durable_name: env::var("NORMALIZE_DURABLE_NAME").ok(),
            max_deliver: parse_env("NORMALIZE_MAX_DELIVER"),
            ack_wait: parse_env::<u64>("NORMALIZE_ACK_WAIT_SECS").map(Duration::from_secs),
            batch_size: parse_env("NORMALIZE_BATCH_SIZE"),
            process_timeout: parse_env::<u64>("NORMALIZE_PROCESS_TIMEOUT_SECS")
                .map(Duration::from_secs),
        }
    }

    /// Apply the env overrides to a stream-derived consumer config.
    pub fn apply(&self, mut config: nats_consumer::ConsumerConfig) -> nats_consumer::ConsumerConfig {
        if let Some(durable) = &self.durable_name {
            config.durable_name = durable.clone();
        }
        if let Some(max_deliver) = self.max_deliver {
            config.max_deliver = max_deliver;
        }
        if let Some(ack_wait) = self.ack_wait {
            config.ack_wait = ack_wait;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size.max(1);
        }
        if let Some(timeout) = self.process_timeout {
            config.process_timeout = timeout;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_coaching::WebhookStream;
    use nats_consumer::ConsumerConfig;

    #[test]
    fn test_defaults_when_env_unset() {
        temp_env::with_vars_unset(
            [
                "NORMALIZE_HEALTH_PORT",
                "HEALTH_PORT",
                "NORMALIZE_DURABLE_NAME",
                "NORMALIZE_MAX_DELIVER",
                "NORMALIZE_ACK_WAIT_SECS",
                "NORMALIZE_BATCH_SIZE",
                "NORMALIZE_PROCESS_TIMEOUT_SECS",
            ],
            || {
                let settings = WorkerSettings::from_env();
                assert_eq!(settings.health_port, 8081);

                let config = settings.apply(ConsumerConfig::from_stream::<WebhookStream>());
                assert_eq!(config.durable_name, "normalize-worker");
                assert_eq!(config.max_deliver, 5);
                assert_eq!(config.batch_size, 1);
            },
        );
    }

    #[test]
    fn test_env_overrides_apply() {
        temp_env::with_vars(
            [
                ("NORMALIZE_HEALTH_PORT", Some("9090")),
                ("NORMALIZE_MAX_DELIVER", Some("3")),
                ("NORMALIZE_BATCH_SIZE", Some("0")),
            ],
            || {
                let settings = WorkerSettings::from_env();
                assert_eq!(settings.health_port, 9090);

                let config = settings.apply(ConsumerConfig::from_stream::<WebhookStream>());
                assert_eq!(config.max_deliver, 3);
                // Batch size never drops below 1.
                assert_eq!(config.batch_size, 1);
            },
        );
    }
}
