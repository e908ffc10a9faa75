use crate::{env_or_default, ConfigError, FromEnv};

/// NATS connection configuration
#[derive(Clone, Debug)]
pub struct NatsConfig {
    pub url: String,
}

impl FromEnv for NatsConfig {
    /// Reads NATS_URL, defaulting to a local server
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_or_default("NATS_URL", "nats://localhost:4222");
        Ok(Self { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nats_config_default_url() {
        temp_env::with_var("NATS_URL", None::<&str>, || {
            let config = NatsConfig::from_env().unwrap();
            assert_eq!(config.url, "nats://localhost:4222");
        });
    }

    #[test]
    fn test_nats_config_custom_url() {
        temp_env::with_var("NATS_URL", Some("nats://nats.internal:4222"), || {
            let config = NatsConfig::from_env().unwrap();
            assert_eq!(config.url, "nats://nats.internal:4222");
        });
    }
}
