mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{
    connect, connect_from_config, connect_from_config_with_retry, connect_with_options,
    connect_with_retry, run_migrations,
};
pub use health::check_database;

// Re-exported so app crates don't need a direct sea-orm dependency for state types
pub use sea_orm::DatabaseConnection;
