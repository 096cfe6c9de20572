//! Warranties Domain
//!
//! Product warranties as date intervals. Creation computes the end date from
//! the period in months and rejects overlapping intervals for the same
//! product; validation and claims compare against today.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{WarrantyError, WarrantyResult};
pub use models::{CreateWarranty, Warranty};
pub use postgres::PgWarrantyRepository;
pub use repository::{InMemoryWarrantyRepository, WarrantyRepository};
pub use service::WarrantyService;
