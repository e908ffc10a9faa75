use crate::{env_or_default, env_required, ConfigError, FromEnv};

/// Redis connection configuration
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub uri: String,
}

impl FromEnv for RedisConfig {
    /// Builds the connection URI from environment variables.
    /// REDIS_HOST is required; REDIS_PORT defaults to 6379.
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_required("REDIS_HOST")?;
        let port = env_or_default("REDIS_PORT", "6379");
        let uri = format!("redis://{}:{}", host, port);
        Ok(Self { uri })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_config_from_env() {
        temp_env::with_vars(
            [
                ("REDIS_HOST", Some("redis.internal")),
                ("REDIS_PORT", Some("6380")),
            ],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.uri, "redis://redis.internal:6380");
            },
        );
    }

    #[test]
    fn test_redis_config_default_port() {
        temp_env::with_vars(
            [("REDIS_HOST", Some("localhost")), ("REDIS_PORT", None)],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.uri, "redis://localhost:6379");
            },
        );
    }

    #[test]
    fn test_redis_config_missing_host() {
        temp_env::with_var("REDIS_HOST", None::<&str>, || {
            let result = RedisConfig::from_env();
            assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
        });
    }
}
