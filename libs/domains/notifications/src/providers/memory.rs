//! In-memory email provider that records instead of sending.
//!
//! Used by service tests and local development without an SMTP server.

use super::{EmailContent, EmailProvider, SentEmail};
use crate::error::NotificationResult;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Default, Clone)]
pub struct MemoryProvider {
    sent: Arc<Mutex<Vec<EmailContent>>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emails recorded so far, oldest first.
    pub fn sent(&self) -> Vec<EmailContent> {
        self.sent.lock().expect("mail recorder poisoned").clone()
    }
}

#[async_trait]
impl EmailProvider for MemoryProvider {
    async fn send(&self, email: &EmailContent) -> NotificationResult<SentEmail> {
        info!(to = %email.to_email, subject = %email.subject, "Recording email (memory provider)");
        let mut sent = self.sent.lock().expect("mail recorder poisoned");
        sent.push(email.clone());

        Ok(SentEmail {
            message_id: Some(format!("memory-{}", sent.len())),
            accepted: true,
        })
    }

    fn name(&self) -> &'static str {
        "Memory"
    }

    async fn health_check(&self) -> NotificationResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_records() {
        let provider = MemoryProvider::new();

        provider
            .send(&EmailContent {
                to_email: "alice@example.com".to_string(),
                subject: "Your OTP Code".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let sent = provider.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_email, "alice@example.com");
    }
}
