use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{Role, User},
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn map_db_err(user_email: &str, e: sea_orm::DbErr) -> UserError {
        let err_str = e.to_string();
        if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
            UserError::DuplicateEmail(user_email.to_string())
        } else {
            UserError::Internal(format!("Database error: {}", e))
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let email = user.email.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = self
            .base
            .insert(active_model)
            .await
            .map_err(|e| Self::map_db_err(&email, e))?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(Into::into))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email.to_lowercase()))
            .one(self.base.db())
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(Into::into))
    }

    async fn get_by_reset_token(&self, token: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::ResetToken.eq(token))
            .one(self.base.db())
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(Into::into))
    }

    async fn find_admin(&self) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Role.eq(Role::Admin))
            .one(self.base.db())
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, page: u64, limit: u64) -> UserResult<(Vec<User>, u64)> {
        let total = entity::Entity::find()
            .count(self.base.db())
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .limit(limit)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .all(self.base.db())
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let id = user.id;
        let email = user.email.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = self
            .base
            .update(active_model)
            .await
            .map_err(|e| Self::map_db_err(&email, e))?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let rows_affected = self
            .base
            .delete_by_id(id)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        if rows_affected > 0 {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(rows_affected > 0)
    }
}
