use crate::models::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity for the users table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    pub otp: Option<String>,
    pub otp_created_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub refresh_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expiry: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<crate::models::User> for ActiveModel {
    fn from(user: crate::models::User) -> Self {
        use sea_orm::ActiveValue::Set;

        ActiveModel {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            role: Set(user.role),
            is_verified: Set(user.is_verified),
            otp: Set(user.otp),
            otp_created_at: Set(user.otp_created_at.map(Into::into)),
            refresh_token: Set(user.refresh_token),
            reset_token: Set(user.reset_token),
            reset_token_expiry: Set(user.reset_token_expiry.map(Into::into)),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}

impl From<Model> for crate::models::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            role: model.role,
            is_verified: model.is_verified,
            otp: model.otp,
            otp_created_at: model.otp_created_at.map(Into::into),
            refresh_token: model.refresh_token,
            reset_token: model.reset_token,
            reset_token_expiry: model.reset_token_expiry.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
