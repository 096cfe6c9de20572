//! Email template rendering engine (Handlebars).

use crate::error::{NotificationError, NotificationResult};
use crate::models::{OtpEmailData, PasswordResetEmailData};
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Rendered email content.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    /// HTML body content.
    pub html: String,
    /// Plain text body content.
    pub text: String,
    /// Email subject line.
    pub subject: String,
}

/// Template engine for rendering email templates.
pub struct TemplateEngine {
    handlebars: Arc<Handlebars<'static>>,
}

impl TemplateEngine {
    /// Create a new template engine with all templates registered.
    pub fn new() -> NotificationResult<Self> {
        let mut handlebars = Handlebars::new();

        let templates = [
            ("otp_html", OTP_HTML_TEMPLATE),
            ("otp_text", OTP_TEXT_TEMPLATE),
            ("password_reset_html", PASSWORD_RESET_HTML_TEMPLATE),
            ("password_reset_text", PASSWORD_RESET_TEXT_TEMPLATE),
        ];

        for (name, source) in templates {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| {
                    NotificationError::TemplateError(format!("Failed to register {}: {}", name, e))
                })?;
        }

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    fn render<T: Serialize>(&self, template_name: &str, data: &T) -> NotificationResult<String> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| NotificationError::TemplateError(e.to_string()))
    }

    /// Render the OTP verification email.
    pub fn render_otp(&self, data: &OtpEmailData) -> NotificationResult<RenderedEmail> {
        debug!(user = %data.username, "Rendering OTP email");

        Ok(RenderedEmail {
            html: self.render("otp_html", data)?,
            text: self.render("otp_text", data)?,
            subject: "Your OTP Code".to_string(),
        })
    }

    /// Render the password reset email.
    pub fn render_password_reset(
        &self,
        data: &PasswordResetEmailData,
    ) -> NotificationResult<RenderedEmail> {
        debug!(user = %data.username, "Rendering password reset email");

        Ok(RenderedEmail {
            html: self.render("password_reset_html", data)?,
            text: self.render("password_reset_text", data)?,
            subject: "Password Reset".to_string(),
        })
    }
}

const OTP_HTML_TEMPLATE: &str = r#"<html>
<body style="font-family: sans-serif; color: #222;">
  <h2>Verify your email</h2>
  <p>Hi {{username}},</p>
  <p>Your one-time verification code is:</p>
  <p style="font-size: 28px; font-weight: bold; letter-spacing: 4px;">{{code}}</p>
  <p>The code expires in {{expires_minutes}} minutes. If you did not create an
  account, you can ignore this email.</p>
</body>
</html>"#;

const OTP_TEXT_TEMPLATE: &str = r#"Hi {{username}},

Your OTP code is {{code}}

The code expires in {{expires_minutes}} minutes. If you did not create an
account, you can ignore this email.
"#;

const PASSWORD_RESET_HTML_TEMPLATE: &str = r#"<html>
<body style="font-family: sans-serif; color: #222;">
  <h2>Password reset</h2>
  <p>Hi {{username}},</p>
  <p>You requested a password reset. Click the link below to choose a new
  password:</p>
  <p><a href="{{reset_url}}">{{reset_url}}</a></p>
  <p>The link expires in {{expires_hours}} hour(s). If you did not request a
  reset, you can ignore this email.</p>
</body>
</html>"#;

const PASSWORD_RESET_TEXT_TEMPLATE: &str = r#"Hi {{username}},

You requested a password reset. Open this link to choose a new password:

{{reset_url}}

The link expires in {{expires_hours}} hour(s). If you did not request a reset,
you can ignore this email.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_otp_contains_code() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine
            .render_otp(&OtpEmailData {
                username: "alice".to_string(),
                code: "123456".to_string(),
                expires_minutes: 5,
            })
            .unwrap();

        assert!(rendered.text.contains("123456"));
        assert!(rendered.html.contains("123456"));
        assert!(rendered.text.contains("5 minutes"));
        assert_eq!(rendered.subject, "Your OTP Code");
    }

    #[test]
    fn test_render_password_reset_contains_url() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine
            .render_password_reset(&PasswordResetEmailData {
                username: "alice".to_string(),
                reset_url: "https://shop.example.com/reset-password?token=abc".to_string(),
                expires_hours: 1,
            })
            .unwrap();

        assert!(rendered.text.contains("token=abc"));
        assert!(rendered.html.contains("token=abc"));
        assert_eq!(rendered.subject, "Password Reset");
    }
}
