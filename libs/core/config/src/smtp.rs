use crate::{env_or_default, env_parse_or_default, ConfigError, FromEnv};

/// SMTP configuration for outgoing mail.
///
/// Loaded from environment variables:
/// - `SMTP_HOST` (default: localhost)
/// - `SMTP_PORT` (default: 1025, the Mailpit/MailHog dev port)
/// - `SMTP_FROM_EMAIL` (default: noreply@localhost)
/// - `SMTP_FROM_NAME` (default: Storefront)
/// - `SMTP_USERNAME` / `SMTP_PASSWORD` (optional)
/// - `SMTP_USE_TLS` (default: false, local dev servers are plaintext)
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_email: String,
    pub from_name: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

impl SmtpConfig {
    pub fn new(host: String, port: u16, from_email: String, from_name: String) -> Self {
        Self {
            host,
            port,
            from_email,
            from_name,
            username: None,
            password: None,
            use_tls: false,
        }
    }

    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }

    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }
}

impl FromEnv for SmtpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or_default("SMTP_HOST", "localhost"),
            port: env_parse_or_default("SMTP_PORT", "1025")?,
            from_email: env_or_default("SMTP_FROM_EMAIL", "noreply@localhost"),
            from_name: env_or_default("SMTP_FROM_NAME", "Storefront"),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            use_tls: env_or_default("SMTP_USE_TLS", "false") == "true",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_config_defaults() {
        temp_env::with_vars(
            [
                ("SMTP_HOST", None::<&str>),
                ("SMTP_PORT", None),
                ("SMTP_USERNAME", None),
                ("SMTP_PASSWORD", None),
                ("SMTP_USE_TLS", None),
            ],
            || {
                let config = SmtpConfig::from_env().unwrap();
                assert_eq!(config.host, "localhost");
                assert_eq!(config.port, 1025);
                assert!(config.username.is_none());
                assert!(!config.use_tls);
            },
        );
    }

    #[test]
    fn test_smtp_config_with_credentials() {
        let config = SmtpConfig::new(
            "smtp.example.com".to_string(),
            587,
            "noreply@example.com".to_string(),
            "Example".to_string(),
        )
        .with_credentials("user".to_string(), "pass".to_string())
        .with_tls(true);

        assert_eq!(config.username.as_deref(), Some("user"));
        assert!(config.use_tls);
    }

    #[test]
    fn test_smtp_config_invalid_port() {
        temp_env::with_var("SMTP_PORT", Some("banana"), || {
            assert!(SmtpConfig::from_env().is_err());
        });
    }
}
