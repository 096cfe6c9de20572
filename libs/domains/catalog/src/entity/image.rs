use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity for the images table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub url: String,
    /// Images can exist detached and be attached to a product later
    pub product_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Image {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            product_id: model.product_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<crate::models::Image> for ActiveModel {
    fn from(image: crate::models::Image) -> Self {
        use sea_orm::ActiveValue::Set;

        ActiveModel {
            id: Set(image.id),
            url: Set(image.url),
            product_id: Set(image.product_id),
            created_at: Set(image.created_at.into()),
        }
    }
}
