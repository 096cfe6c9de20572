use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{WarrantyError, WarrantyResult},
    models::Warranty,
    repository::WarrantyRepository,
};

fn db_err(e: sea_orm::DbErr) -> WarrantyError {
    WarrantyError::Internal(format!("Database error: {}", e))
}

/// PostgreSQL implementation of WarrantyRepository
#[derive(Clone)]
pub struct PgWarrantyRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgWarrantyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl WarrantyRepository for PgWarrantyRepository {
    async fn create_if_no_overlap(&self, warranty: Warranty) -> WarrantyResult<Warranty> {
        // Check and insert in one transaction so two creations can't both
        // pass the check against the same committed state
        let txn = self.base.db().begin().await.map_err(db_err)?;

        let overlapping = entity::Entity::find()
            .filter(entity::Column::ProductId.eq(warranty.product_id))
            .filter(entity::Column::EndDate.gte(warranty.start_date))
            .filter(entity::Column::StartDate.lte(warranty.end_date))
            .one(&txn)
            .await
            .map_err(db_err)?;

        if overlapping.is_some() {
            txn.rollback().await.map_err(db_err)?;
            return Err(WarrantyError::Overlapping);
        }

        let model = entity::ActiveModel::from(warranty)
            .insert(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(warranty_id = %model.id, product_id = %model.product_id, "Created warranty");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> WarrantyResult<Option<Warranty>> {
        Ok(self
            .base
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn latest_for_product(&self, product_id: Uuid) -> WarrantyResult<Option<Warranty>> {
        let model = entity::Entity::find()
            .filter(entity::Column::ProductId.eq(product_id))
            .order_by_desc(entity::Column::EndDate)
            .one(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(model.map(Into::into))
    }

    async fn all_for_product(&self, product_id: Uuid) -> WarrantyResult<Vec<Warranty>> {
        let models = entity::Entity::find()
            .filter(entity::Column::ProductId.eq(product_id))
            .order_by_asc(entity::Column::StartDate)
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list(&self, page: u64, limit: u64) -> WarrantyResult<(Vec<Warranty>, u64)> {
        let total = entity::Entity::find()
            .count(self.base.db())
            .await
            .map_err(db_err)?;

        let models = entity::Entity::find()
            .order_by_desc(entity::Column::CreatedAt)
            .limit(limit)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}
