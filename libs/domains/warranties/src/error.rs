use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WarrantyError {
    #[error("Warranty not found: {0}")]
    NotFound(Uuid),

    #[error("No warranty exists for product {0}")]
    NoneForProduct(Uuid),

    #[error("Overlapping warranty exists for this product")]
    Overlapping,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User does not have the required roles")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WarrantyResult<T> = Result<T, WarrantyError>;

impl From<WarrantyError> for AppError {
    fn from(err: WarrantyError) -> Self {
        match err {
            WarrantyError::NotFound(id) => {
                AppError::NotFound(format!("Warranty {} not found", id))
            }
            WarrantyError::NoneForProduct(_) => {
                AppError::NotFound("Warranty not found".to_string())
            }
            WarrantyError::Overlapping => {
                AppError::BadRequest("Overlapping warranty exists for this product".to_string())
            }
            WarrantyError::Validation(msg) => AppError::BadRequest(msg),
            WarrantyError::Forbidden => {
                AppError::Forbidden("User does not have the required roles".to_string())
            }
            WarrantyError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for WarrantyError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_overlap_is_bad_request() {
        let response = WarrantyError::Overlapping.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_none_for_product_is_404() {
        let response = WarrantyError::NoneForProduct(Uuid::nil()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
