use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity for the warranties table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warranties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    /// Coverage period in months
    pub period: i32,
    pub start_date: Date,
    pub end_date: Date,
    #[sea_orm(column_type = "Text")]
    pub details: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Warranty {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            period: model.period,
            start_date: model.start_date,
            end_date: model.end_date,
            details: model.details,
            created_at: model.created_at.into(),
        }
    }
}

impl From<crate::models::Warranty> for ActiveModel {
    fn from(warranty: crate::models::Warranty) -> Self {
        use sea_orm::ActiveValue::Set;

        ActiveModel {
            id: Set(warranty.id),
            product_id: Set(warranty.product_id),
            period: Set(warranty.period),
            start_date: Set(warranty.start_date),
            end_date: Set(warranty.end_date),
            details: Set(warranty.details),
            created_at: Set(warranty.created_at.into()),
        }
    }
}
