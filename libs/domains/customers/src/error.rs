use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    #[error("A customer profile already exists for user {0}")]
    DuplicateUser(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User does not have the required roles")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CustomerResult<T> = Result<T, CustomerError>;

impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound(id) => {
                AppError::NotFound(format!("Customer {} not found", id))
            }
            CustomerError::DuplicateUser(user_id) => AppError::Conflict(format!(
                "A customer profile already exists for user {}",
                user_id
            )),
            CustomerError::Validation(msg) => AppError::BadRequest(msg),
            CustomerError::Forbidden => {
                AppError::Forbidden("User does not have the required roles".to_string())
            }
            CustomerError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CustomerError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
