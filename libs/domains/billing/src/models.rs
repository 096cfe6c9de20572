use chrono::{DateTime, Utc};
use domain_orders::Order;
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Payment lifecycle states
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
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Amount captured from the order total at creation time
    #[schema(value_type = String)]
    pub amount: Decimal,
    /// Payment method copied from the order
    pub method: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Build a completed payment from a pending order.
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: Uuid::now_v7(),
            order_id: order.id,
            amount: order.total,
            method: order.payment_method.to_string(),
            status: PaymentStatus::Completed,
            created_at: Utc::now(),
        }
    }
}

/// Payment with its order relation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    #[serde(flatten)]
    pub payment: Payment,
    pub order: Option<Order>,
}

/// Per-item warranty summary line on a receipt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct WarrantyInfo {
    pub product: String,
    /// Comma-joined warranty periods in months, or "No warranty"
    pub warranty_period: String,
}

/// Receipt entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Receipt {
    pub id: Uuid,
    pub name: String,
    pub order_id: Uuid,
    pub payment_id: Uuid,
    pub issued_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub warranty_info: Vec<WarrantyInfo>,
}

/// Receipt with its relations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReceiptResponse {
    #[serde(flatten)]
    pub receipt: Receipt,
    pub order: Option<Order>,
    pub payment: Option<Payment>,
}

/// DTO for creating a payment against a pending order
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePayment {
    pub order_id: Uuid,
}

/// DTO for generating a receipt
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReceipt {
    pub order_id: Uuid,
    pub payment_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_orders::{OrderStatus, PaymentMethod};

    #[test]
    fn test_payment_from_order_copies_total_and_method() {
        let now = Utc::now();
        let order = Order {
            id: Uuid::now_v7(),
            customer_id: Uuid::now_v7(),
            total: Decimal::new(12345, 2),
            status: OrderStatus::Pending,
            payment_method: PaymentMethod::Transfer,
            created_at: now,
            updated_at: now,
        };

        let payment = Payment::from_order(&order);
        assert_eq!(payment.order_id, order.id);
        assert_eq!(payment.amount, Decimal::new(12345, 2));
        assert_eq!(payment.method, "transfer");
        assert_eq!(payment.status, PaymentStatus::Completed);
    }

    #[test]
    fn test_payment_status_round_trip() {
        assert_eq!(PaymentStatus::Completed.to_string(), "completed");
        assert_eq!("failed".parse::<PaymentStatus>().unwrap(), PaymentStatus::Failed);
    }
}
