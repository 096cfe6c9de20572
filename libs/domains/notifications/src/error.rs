use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Email provider error: {0}")]
    ProviderError(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

pub type NotificationResult<T> = Result<T, NotificationError>;
