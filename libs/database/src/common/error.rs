use thiserror::Error;

/// Unified error type for database operations across backends.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Connection failed after {attempts} attempts: {details}")]
    ConnectionExhausted { attempts: u32, details: String },
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
