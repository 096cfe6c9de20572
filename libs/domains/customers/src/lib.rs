//! Customers Domain
//!
//! Customer profiles: the billing/shipping identity attached to a user
//! account. One customer per user; orders hang off the customer.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CustomerError, CustomerResult};
pub use models::{CreateCustomer, Customer, UpdateCustomer};
pub use postgres::PgCustomerRepository;
pub use repository::{CustomerRepository, InMemoryCustomerRepository};
pub use service::CustomerService;
