//! Billing Domain
//!
//! Payments and receipts:
//!
//! - Payments are created against pending orders, capturing the order's
//!   total and payment method
//! - Receipts summarize an order/payment pair, including per-product
//!   warranty periods, and render a PDF to local disk

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pdf;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{BillingError, BillingResult};
pub use models::{
    CreatePayment, CreateReceipt, Payment, PaymentResponse, PaymentStatus, Receipt,
    ReceiptResponse, WarrantyInfo,
};
pub use postgres::PgBillingRepository;
pub use repository::{BillingRepository, InMemoryBillingRepository};
pub use service::BillingService;
