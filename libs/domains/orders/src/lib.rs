//! Orders Domain
//!
//! Orders and order items:
//!
//! - Order items are created detached against a product, with stock and
//!   price validation, and attached to an order later
//! - `order.total` is always the full `sum(quantity * price)` over the
//!   attached items, rewritten in the same transaction as any item mutation
//! - One order per customer
//! - Redis cache-aside on the order read paths

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use models::{
    order_total, CreateOrder, CreateOrderItem, Order, OrderItem, OrderItemResponse, OrderResponse,
    OrderStatus, PaymentMethod, UpdateOrder, UpdateOrderItem,
};
pub use postgres::PgOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
