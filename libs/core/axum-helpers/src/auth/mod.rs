//! JWT authentication and role-based route guards.

mod config;
mod jwt;
mod middleware;

pub use config::JwtConfig;
pub use jwt::{JwtAuth, JwtClaims, ACCESS_TOKEN_TTL, REFRESH_TOKEN_TTL};
pub use middleware::{ensure_self_or_admin, jwt_auth_middleware, require_roles};

/// Role claim value for administrators.
pub const ROLE_ADMIN: &str = "admin";

/// Role claim value for customers (the default role).
pub const ROLE_CUSTOMER: &str = "customer";
