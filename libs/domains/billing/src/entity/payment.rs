use crate::models::PaymentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity for the payments table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    /// Payment method copied from the order at creation time
    pub method: String,
    pub status: PaymentStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "domain_orders::entity::order::Entity",
        from = "Column::OrderId",
        to = "domain_orders::entity::order::Column::Id"
    )]
    Order,
    #[sea_orm(has_many = "super::receipt::Entity")]
    Receipt,
}

impl Related<domain_orders::entity::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::receipt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Payment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            amount: model.amount,
            method: model.method,
            status: model.status,
            created_at: model.created_at.into(),
        }
    }
}

impl From<crate::models::Payment> for ActiveModel {
    fn from(payment: crate::models::Payment) -> Self {
        use sea_orm::ActiveValue::Set;

        ActiveModel {
            id: Set(payment.id),
            order_id: Set(payment.order_id),
            amount: Set(payment.amount),
            method: Set(payment.method),
            status: Set(payment.status),
            created_at: Set(payment.created_at.into()),
        }
    }
}
