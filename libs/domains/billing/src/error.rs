use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    #[error("Receipt not found: {0}")]
    ReceiptNotFound(Uuid),

    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Order total must be greater than zero")]
    OrderTotalNotPositive,

    #[error("Order status must be pending to create a payment")]
    OrderNotPending,

    #[error("Receipt document is missing")]
    PdfMissing,

    #[error("Failed to render receipt document: {0}")]
    PdfRender(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User does not have the required roles")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BillingResult<T> = Result<T, BillingError>;

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::PaymentNotFound(id) => {
                AppError::NotFound(format!("Payment with id {} not found", id))
            }
            BillingError::ReceiptNotFound(id) => {
                AppError::NotFound(format!("Receipt with id {} not found", id))
            }
            BillingError::OrderNotFound(id) => {
                AppError::NotFound(format!("Order with id {} not found", id))
            }
            BillingError::OrderTotalNotPositive => {
                AppError::BadRequest("Order total must be greater than zero".to_string())
            }
            BillingError::OrderNotPending => AppError::BadRequest(
                "Order status must be pending to create a payment".to_string(),
            ),
            BillingError::PdfMissing => AppError::NotFound("Receipt not found".to_string()),
            BillingError::PdfRender(msg) => {
                tracing::error!("Receipt PDF rendering failed: {}", msg);
                AppError::InternalServerError("Failed to generate receipt".to_string())
            }
            BillingError::Validation(msg) => AppError::BadRequest(msg),
            BillingError::Forbidden => {
                AppError::Forbidden("User does not have the required roles".to_string())
            }
            BillingError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for BillingError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
