use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    entity,
    error::{CustomerError, CustomerResult},
    models::{CreateCustomer, Customer, UpdateCustomer},
    repository::CustomerRepository,
};

/// PostgreSQL implementation of CustomerRepository
#[derive(Clone)]
pub struct PgCustomerRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create(&self, input: CreateCustomer) -> CustomerResult<Customer> {
        if self.get_by_user_id(input.user_id).await?.is_some() {
            return Err(CustomerError::DuplicateUser(input.user_id));
        }

        let user_id = input.user_id;
        let active_model: entity::ActiveModel = Customer::new(input).into();

        let model = self.base.insert(active_model).await.map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
                CustomerError::DuplicateUser(user_id)
            } else {
                CustomerError::Internal(format!("Database error: {}", e))
            }
        })?;

        tracing::info!(customer_id = %model.id, "Created customer");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> CustomerResult<Option<Customer>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| CustomerError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(Into::into))
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> CustomerResult<Option<Customer>> {
        let model = entity::Entity::find()
            .filter(entity::Column::UserId.eq(user_id))
            .one(self.base.db())
            .await
            .map_err(|e| CustomerError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, page: u64, limit: u64) -> CustomerResult<(Vec<Customer>, u64)> {
        let total = entity::Entity::find()
            .count(self.base.db())
            .await
            .map_err(|e| CustomerError::Internal(format!("Database error: {}", e)))?;

        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .limit(limit)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .all(self.base.db())
            .await
            .map_err(|e| CustomerError::Internal(format!("Database error: {}", e)))?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: Uuid, input: UpdateCustomer) -> CustomerResult<Customer> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| CustomerError::Internal(format!("Database error: {}", e)))?
            .ok_or(CustomerError::NotFound(id))?;

        let mut customer: Customer = model.into();
        customer.apply_update(input);

        let updated = self
            .base
            .update(entity::ActiveModel::from(customer))
            .await
            .map_err(|e| CustomerError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(customer_id = %id, "Updated customer");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> CustomerResult<bool> {
        let rows_affected = self
            .base
            .delete_by_id(id)
            .await
            .map_err(|e| CustomerError::Internal(format!("Database error: {}", e)))?;

        if rows_affected > 0 {
            tracing::info!(customer_id = %id, "Deleted customer");
        }
        Ok(rows_affected > 0)
    }
}
