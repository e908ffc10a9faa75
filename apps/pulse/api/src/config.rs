use core_config::redis::RedisConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let redis = RedisConfig::from_env()?; // Required - will fail if REDIS_HOST is not set

        Ok(Self {
            app: app_info!(),
            redis,
            server,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_requires_redis_host() {
        temp_env::with_vars([("REDIS_HOST", None::<&str>)], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn from_env_with_defaults() {
        temp_env::with_vars(
            [
                ("REDIS_HOST", Some("localhost")),
                ("HOST", None),
                ("PORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.server.address(), "0.0.0.0:8080");
                assert!(config.redis.uri.contains("localhost"));
            },
        );
    }
}
