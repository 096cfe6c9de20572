//! Shared application state.
//!
//! Handlers receive their domain services directly through router state; this
//! struct carries what the readiness endpoint and shutdown path need.

use axum_helpers::JwtAuth;

use crate::config::Config;

/// Connection handles shared across the app. Cloning is cheap (pool handles).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Redis connection manager
    pub redis: database::redis::ConnectionManager,
    /// JWT signing/verification
    pub jwt_auth: JwtAuth,
}
