use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Category '{0}' does not exist")]
    CategoryNameNotFound(String),

    #[error("Category with name '{0}' already exists")]
    DuplicateCategoryName(String),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Image not found: {0}")]
    ImageNotFound(Uuid),

    #[error("Image with ID '{0}' does not exist")]
    ImageReferenceMissing(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User does not have the required roles")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(id) => {
                AppError::NotFound(format!("Category {} not found", id))
            }
            CatalogError::CategoryNameNotFound(name) => {
                AppError::BadRequest(format!("Category '{}' does not exist", name))
            }
            CatalogError::DuplicateCategoryName(name) => {
                AppError::Conflict(format!("Category with name '{}' already exists", name))
            }
            CatalogError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            CatalogError::ImageNotFound(id) => {
                AppError::NotFound(format!("Image {} not found", id))
            }
            CatalogError::ImageReferenceMissing(id) => {
                AppError::BadRequest(format!("Image with ID '{}' does not exist", id))
            }
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::Forbidden => {
                AppError::Forbidden("User does not have the required roles".to_string())
            }
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
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
    fn test_category_by_name_missing_is_bad_request() {
        // Creating a product against an unknown category name is a client
        // error, not a 404 on the product route
        let response = CatalogError::CategoryNameNotFound("Garden".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_product_not_found_is_404() {
        let response = CatalogError::ProductNotFound(Uuid::nil()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_category_is_conflict() {
        let response = CatalogError::DuplicateCategoryName("Garden".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
