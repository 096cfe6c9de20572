//! Users Domain
//!
//! User accounts and authentication for the storefront:
//!
//! - User CRUD with Argon2 password hashing
//! - OTP email verification on registration
//! - Login with JWT access/refresh tokens
//! - Password reset via emailed token
//! - Role-based access control (customer / admin)

pub mod auth_handlers;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{LoginRequest, RegisterRequest, Role, UpdateUser, User, UserResponse};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
