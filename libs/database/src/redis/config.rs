use core_config::{env_parse_or_default, env_required, ConfigError, FromEnv};

/// Redis configuration.
///
/// Loaded from environment variables:
/// - `REDIS_HOST` (required) - full connection URI, e.g. `redis://127.0.0.1:6379`
/// - `CACHE_TTL_SECS` (default: 300) - default TTL for cache-aside entries
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
    pub cache_ttl_secs: u64,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cache_ttl_secs: 300,
        }
    }
}

impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("REDIS_HOST")?,
            cache_ttl_secs: env_parse_or_default("CACHE_TTL_SECS", "300")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_config_from_env_success() {
        temp_env::with_vars(
            [
                ("REDIS_HOST", Some("redis://localhost:6379")),
                ("CACHE_TTL_SECS", None),
            ],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.url, "redis://localhost:6379");
                assert_eq!(config.cache_ttl_secs, 300);
            },
        );
    }

    #[test]
    fn test_redis_config_from_env_missing() {
        temp_env::with_var_unset("REDIS_HOST", || {
            let result = RedisConfig::from_env();
            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("REDIS_HOST"));
        });
    }

    #[test]
    fn test_redis_config_custom_ttl() {
        temp_env::with_vars(
            [
                ("REDIS_HOST", Some("redis://localhost:6379")),
                ("CACHE_TTL_SECS", Some("60")),
            ],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.cache_ttl_secs, 60);
            },
        );
    }
}
