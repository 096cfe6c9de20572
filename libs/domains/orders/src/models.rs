use chrono::{DateTime, Utc};
use domain_catalog::Product;
use domain_customers::Customer;
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Order lifecycle states
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Payment methods accepted at checkout
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

impl std::str::FromStr for OrderStatus {
    type Err = sea_orm::DbErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = sea_orm::DbErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    /// Owning customer; at most one order per customer
    pub customer_id: Uuid,
    /// Always `sum(quantity * price)` over the attached items
    #[schema(value_type = String)]
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order item entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub product_id: Uuid,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price: Decimal,
}

impl OrderItem {
    /// Line total for this item.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Sum of `quantity * price` over a set of items.
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(|item| item.line_total()).sum()
}

/// Order item with its relations, as returned by the read endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    #[serde(flatten)]
    pub item: OrderItem,
    pub product: Option<Product>,
    pub order: Option<Order>,
}

/// Order with its relations, as returned by the read endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<Customer>,
    pub items: Vec<ItemWithProduct>,
}

/// Item plus product, embedded in an order response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemWithProduct {
    #[serde(flatten)]
    pub item: OrderItem,
    pub product: Option<Product>,
}

/// DTO for creating an order from previously created items
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    pub customer_id: Uuid,
    /// Detached order items to attach to the new order
    #[validate(length(min = 1))]
    pub order_item_ids: Vec<Uuid>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// DTO for updating an order; replacing the item set recomputes the total
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrder {
    pub status: Option<OrderStatus>,
    pub payment_method: Option<PaymentMethod>,
    /// When present, replaces the order's item set
    pub item_ids: Option<Vec<Uuid>>,
}

/// DTO for creating a detached order item against a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderItem {
    #[validate(range(min = 1))]
    pub quantity: i32,
    /// Must match the product's current price
    #[schema(value_type = String)]
    pub price: Decimal,
}

/// DTO for updating an order item
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderItem {
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
}

/// Pagination for order listings
#[derive(Debug, Clone, Copy, Deserialize, ToSchema, IntoParams)]
pub struct OrderFilter {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32, price_cents: i64) -> OrderItem {
        OrderItem {
            id: Uuid::now_v7(),
            order_id: None,
            product_id: Uuid::now_v7(),
            quantity,
            price: Decimal::new(price_cents, 2),
        }
    }

    #[test]
    fn test_line_total_is_quantity_times_price() {
        assert_eq!(item(3, 1050).line_total(), Decimal::new(3150, 2));
    }

    #[test]
    fn test_order_total_sums_line_totals() {
        let items = [item(2, 1000), item(1, 550)];
        assert_eq!(order_total(&items), Decimal::new(2550, 2));
    }

    #[test]
    fn test_order_total_of_empty_set_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert_eq!(PaymentMethod::Card.to_string(), "card");
    }
}
