use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity for the receipts table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub order_id: Uuid,
    pub payment_id: Uuid,
    pub issued_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_amount: Decimal,
    /// Per-item warranty summary: `[{product, warranty_period}]`
    pub warranty_info: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "domain_orders::entity::order::Entity",
        from = "Column::OrderId",
        to = "domain_orders::entity::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::payment::Entity",
        from = "Column::PaymentId",
        to = "super::payment::Column::Id"
    )]
    Payment,
}

impl Related<domain_orders::entity::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Receipt {
    fn from(model: Model) -> Self {
        let warranty_info = serde_json::from_value(model.warranty_info).unwrap_or_default();

        Self {
            id: model.id,
            name: model.name,
            order_id: model.order_id,
            payment_id: model.payment_id,
            issued_at: model.issued_at.into(),
            total_amount: model.total_amount,
            warranty_info,
        }
    }
}

impl From<crate::models::Receipt> for ActiveModel {
    fn from(receipt: crate::models::Receipt) -> Self {
        use sea_orm::ActiveValue::Set;

        let warranty_info =
            serde_json::to_value(&receipt.warranty_info).unwrap_or(serde_json::Value::Null);

        ActiveModel {
            id: Set(receipt.id),
            name: Set(receipt.name),
            order_id: Set(receipt.order_id),
            payment_id: Set(receipt.payment_id),
            issued_at: Set(receipt.issued_at.into()),
            total_amount: Set(receipt.total_amount),
            warranty_info: Set(warranty_info),
        }
    }
}
