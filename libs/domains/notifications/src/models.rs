//! Template data for the transactional emails.

use serde::Serialize;

/// Data for the OTP verification email.
#[derive(Debug, Clone, Serialize)]
pub struct OtpEmailData {
    /// Recipient display name.
    pub username: String,
    /// Six-digit one-time code.
    pub code: String,
    /// Validity window in minutes, shown in the mail body.
    pub expires_minutes: u32,
}

/// Data for the password-reset email.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetEmailData {
    /// Recipient display name.
    pub username: String,
    /// Fully-qualified reset link including the token.
    pub reset_url: String,
    /// Validity window in hours, shown in the mail body.
    pub expires_hours: u32,
}
