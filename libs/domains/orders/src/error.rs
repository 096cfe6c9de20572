use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Order item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Some order items not found")]
    ItemsMissing,

    #[error("Order item {0} is not part of this order")]
    ItemNotInOrder(Uuid),

    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    #[error("An order already exists for this customer")]
    DuplicateOrderForCustomer,

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Insufficient stock")]
    InsufficientStock,

    #[error("Price mismatch, enter the right price from the product")]
    PriceMismatch,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User does not have the required roles")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => {
                AppError::NotFound(format!("Order with ID '{}' not found", id))
            }
            OrderError::ItemNotFound(id) => {
                AppError::NotFound(format!("Order item with ID '{}' not found", id))
            }
            OrderError::ItemsMissing => AppError::NotFound("Some order items not found".to_string()),
            OrderError::ItemNotInOrder(id) => AppError::NotFound(format!(
                "Order item with ID '{}' not found in order",
                id
            )),
            OrderError::CustomerNotFound(_) => AppError::NotFound("Customer not found".to_string()),
            OrderError::DuplicateOrderForCustomer => {
                AppError::Conflict("An order already exists for this customer".to_string())
            }
            OrderError::ProductNotFound(_) => AppError::NotFound("Product not found".to_string()),
            OrderError::InsufficientStock => {
                AppError::BadRequest("Insufficient stock".to_string())
            }
            OrderError::PriceMismatch => AppError::BadRequest(
                "Price mismatch, enter the right price from the product".to_string(),
            ),
            OrderError::Validation(msg) => AppError::BadRequest(msg),
            OrderError::Forbidden => {
                AppError::Forbidden("User does not have the required roles".to_string())
            }
            OrderError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
