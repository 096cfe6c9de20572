use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' not found")]
    EmailNotFound(String),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Please verify your email before logging in")]
    NotVerified,

    #[error("An admin account already exists")]
    AdminAlreadyExists,

    #[error("OTP expired")]
    OtpExpired,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("OTP is still valid, please wait until it expires")]
    OtpStillValid,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User does not have the required roles")]
    Forbidden,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::EmailNotFound(email) => {
                AppError::NotFound(format!("User with email '{}' not found", email))
            }
            UserError::DuplicateEmail(email) => {
                AppError::Conflict(format!("User with email '{}' already exists", email))
            }
            UserError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            UserError::NotVerified => {
                AppError::Unauthorized("Please verify your email before logging in".to_string())
            }
            UserError::AdminAlreadyExists => {
                AppError::Forbidden("Change user role to Customer".to_string())
            }
            UserError::OtpExpired => AppError::Unauthorized("OTP expired".to_string()),
            UserError::InvalidOtp => AppError::BadRequest("Invalid OTP".to_string()),
            UserError::OtpStillValid => AppError::BadRequest(
                "OTP is still valid, please wait until it expires".to_string(),
            ),
            UserError::InvalidRefreshToken => {
                AppError::Unauthorized("Invalid refresh token".to_string())
            }
            UserError::InvalidResetToken => {
                AppError::Unauthorized("Invalid or expired reset token".to_string())
            }
            UserError::WrongCurrentPassword => {
                AppError::BadRequest("Current password is incorrect".to_string())
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Unauthorized => AppError::Unauthorized("Unauthorized".to_string()),
            UserError::Forbidden => {
                AppError::Forbidden("User does not have the required roles".to_string())
            }
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                AppError::InternalServerError("An internal error occurred".to_string())
            }
            UserError::Email(msg) => {
                tracing::error!("Email error: {}", msg);
                AppError::InternalServerError(
                    "Failed to send email. Please try again later.".to_string(),
                )
            }
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
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
    fn test_duplicate_email_is_conflict() {
        let response = UserError::DuplicateEmail("a@b.c".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        let response = UserError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_otp_is_bad_request() {
        let response = UserError::InvalidOtp.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_admin_exists_is_forbidden() {
        let response = UserError::AdminAlreadyExists.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
