mod cache;
mod config;
mod connector;
mod health;

pub use cache::CacheStore;
pub use config::RedisConfig;
pub use connector::{connect, connect_from_config, connect_from_config_with_retry, connect_with_retry};
pub use health::check_redis;

// Re-exported so app crates don't need a direct redis dependency for state types
pub use redis::aio::ConnectionManager;
