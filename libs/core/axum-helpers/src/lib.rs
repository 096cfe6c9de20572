//! # Axum Helpers
//!
//! Utilities, middleware, and helpers shared by the storefront HTTP surface.
//!
//! ## Modules
//!
//! - **[`auth`]**: JWT issuance/verification and role-based route guards
//! - **[`server`]**: Server setup, OpenAPI UIs, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Custom extractors (UUID path, validated JSON)
//! - **[`audit`]**: Audit logging for security-relevant events
//! - **[`health`]**: Liveness and readiness plumbing

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod health;
pub mod http;
pub mod server;
pub mod shutdown;

// Re-export auth types
pub use auth::{
    ensure_self_or_admin, jwt_auth_middleware, require_roles, JwtAuth, JwtClaims, JwtConfig,
    ACCESS_TOKEN_TTL, REFRESH_TOKEN_TTL, ROLE_ADMIN, ROLE_CUSTOMER,
};

// Re-export server types
pub use server::{create_app, create_production_app, create_router};
pub use shutdown::{shutdown_signal, ShutdownCoordinator};

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson};

// Re-export health helpers
pub use health::{health_router, run_health_checks, HealthCheckFuture, HealthResponse};

// Re-export audit types
pub use audit::{extract_ip_from_headers, extract_user_agent, AuditEvent, AuditOutcome};
