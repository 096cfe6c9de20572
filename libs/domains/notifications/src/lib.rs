//! Notifications Domain
//!
//! Outgoing transactional mail for the storefront: OTP verification codes and
//! password-reset links, rendered from Handlebars templates and delivered
//! through a pluggable [`EmailProvider`] (SMTP via lettre in production, an
//! in-memory recorder in tests).

pub mod error;
pub mod models;
pub mod providers;
pub mod service;
pub mod templates;

pub use error::{NotificationError, NotificationResult};
pub use models::{OtpEmailData, PasswordResetEmailData};
pub use providers::{EmailContent, EmailProvider, MemoryProvider, SentEmail, SmtpProvider};
pub use service::MailService;
pub use templates::{RenderedEmail, TemplateEngine};
