use crate::error::NotificationResult;
use crate::models::{OtpEmailData, PasswordResetEmailData};
use crate::providers::{EmailContent, EmailProvider};
use crate::templates::TemplateEngine;
use std::sync::Arc;
use tracing::info;

/// Validity window for OTP codes, shown in the mail body. The authoritative
/// expiry check lives in the users domain.
const OTP_EXPIRES_MINUTES: u32 = 5;

/// Validity window for reset links, shown in the mail body.
const RESET_EXPIRES_HOURS: u32 = 1;

/// Transactional mail facade used by the auth flows.
#[derive(Clone)]
pub struct MailService {
    provider: Arc<dyn EmailProvider>,
    templates: Arc<TemplateEngine>,
    /// Base URL the reset link points at, e.g. `https://shop.example.com`.
    frontend_url: String,
}

impl MailService {
    pub fn new(
        provider: Arc<dyn EmailProvider>,
        frontend_url: impl Into<String>,
    ) -> NotificationResult<Self> {
        Ok(Self {
            provider,
            templates: Arc::new(TemplateEngine::new()?),
            frontend_url: frontend_url.into(),
        })
    }

    /// Send the OTP verification code.
    pub async fn send_otp(
        &self,
        to_email: &str,
        username: &str,
        code: &str,
    ) -> NotificationResult<()> {
        let rendered = self.templates.render_otp(&OtpEmailData {
            username: username.to_string(),
            code: code.to_string(),
            expires_minutes: OTP_EXPIRES_MINUTES,
        })?;

        self.provider
            .send(&EmailContent {
                to_email: to_email.to_string(),
                to_name: username.to_string(),
                subject: rendered.subject,
                html_body: rendered.html,
                text_body: rendered.text,
            })
            .await?;

        info!(to = %to_email, provider = self.provider.name(), "OTP email sent");
        Ok(())
    }

    /// Send the password-reset link.
    pub async fn send_password_reset(
        &self,
        to_email: &str,
        username: &str,
        token: &str,
    ) -> NotificationResult<()> {
        let reset_url = format!("{}/reset-password?token={}", self.frontend_url, token);

        let rendered = self
            .templates
            .render_password_reset(&PasswordResetEmailData {
                username: username.to_string(),
                reset_url,
                expires_hours: RESET_EXPIRES_HOURS,
            })?;

        self.provider
            .send(&EmailContent {
                to_email: to_email.to_string(),
                to_name: username.to_string(),
                subject: rendered.subject,
                html_body: rendered.html,
                text_body: rendered.text,
            })
            .await?;

        info!(to = %to_email, provider = self.provider.name(), "Password reset email sent");
        Ok(())
    }

    /// Provider reachability, surfaced through the readiness endpoint.
    pub async fn health_check(&self) -> NotificationResult<bool> {
        self.provider.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryProvider;

    fn service(provider: &MemoryProvider) -> MailService {
        MailService::new(Arc::new(provider.clone()), "https://shop.example.com").unwrap()
    }

    #[tokio::test]
    async fn test_send_otp_renders_code() {
        let provider = MemoryProvider::new();
        let mail = service(&provider);

        mail.send_otp("alice@example.com", "alice", "654321")
            .await
            .unwrap();

        let sent = provider.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Your OTP Code");
        assert!(sent[0].text_body.contains("654321"));
    }

    #[tokio::test]
    async fn test_send_password_reset_builds_link() {
        let provider = MemoryProvider::new();
        let mail = service(&provider);

        mail.send_password_reset("alice@example.com", "alice", "deadbeef")
            .await
            .unwrap();

        let sent = provider.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0]
            .text_body
            .contains("https://shop.example.com/reset-password?token=deadbeef"));
    }
}
