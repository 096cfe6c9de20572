use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{order, order_item},
    error::{OrderError, OrderResult},
    models::{order_total, ItemWithProduct, Order, OrderItem, OrderItemResponse, OrderResponse},
    repository::OrderRepository,
};

fn db_err(e: DbErr) -> OrderError {
    OrderError::Internal(format!("Database error: {}", e))
}

/// PostgreSQL implementation of OrderRepository.
///
/// Item attach/detach/update/delete and the order-total rewrite always run in
/// one transaction; the total is recomputed as the full sum over the
/// reloaded item set.
#[derive(Clone)]
pub struct PgOrderRepository {
    base: BaseRepository<order::Entity>,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }

    /// Reload the order's items and rewrite its total inside the transaction.
    async fn recompute_total(txn: &DatabaseTransaction, order_id: Uuid) -> Result<order::Model, DbErr> {
        let items: Vec<OrderItem> = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(txn)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let total = order_total(&items);

        order::Entity::update_many()
            .col_expr(order::Column::Total, Expr::value(total))
            .col_expr(
                order::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(order::Column::Id.eq(order_id))
            .exec(txn)
            .await?;

        order::Entity::find_by_id(order_id)
            .one(txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("order {}", order_id)))
    }

    /// Verify every id exists, then point the items at the order.
    async fn attach_items(
        txn: &DatabaseTransaction,
        order_id: Uuid,
        item_ids: &[Uuid],
    ) -> OrderResult<()> {
        let found = order_item::Entity::find()
            .filter(order_item::Column::Id.is_in(item_ids.to_vec()))
            .all(txn)
            .await
            .map_err(db_err)?;

        if found.len() != item_ids.len() {
            return Err(OrderError::ItemsMissing);
        }

        order_item::Entity::update_many()
            .col_expr(order_item::Column::OrderId, Expr::value(Some(order_id)))
            .filter(order_item::Column::Id.is_in(item_ids.to_vec()))
            .exec(txn)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn load_items_with_products<C: ConnectionTrait>(
        conn: &C,
        order_id: Uuid,
    ) -> Result<Vec<ItemWithProduct>, DbErr> {
        let rows = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .find_also_related(domain_catalog::entity::product::Entity)
            .all(conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(item, product)| ItemWithProduct {
                item: item.into(),
                product: product.map(Into::into),
            })
            .collect())
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn insert_order_with_items(
        &self,
        order: Order,
        item_ids: &[Uuid],
    ) -> OrderResult<Order> {
        let txn = self.db().begin().await.map_err(db_err)?;

        let order_id = order.id;
        order::ActiveModel::from(order)
            .insert(&txn)
            .await
            .map_err(db_err)?;

        Self::attach_items(&txn, order_id, item_ids).await?;

        let model = Self::recompute_total(&txn, order_id).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(order_id = %model.id, total = %model.total, "Created order");
        Ok(model.into())
    }

    async fn get_order(&self, id: Uuid) -> OrderResult<Option<Order>> {
        Ok(self
            .base
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn get_order_with_relations(&self, id: Uuid) -> OrderResult<Option<OrderResponse>> {
        let Some((model, customer)) = order::Entity::find_by_id(id)
            .find_also_related(domain_customers::entity::Entity)
            .one(self.db())
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let items = Self::load_items_with_products(self.db(), model.id)
            .await
            .map_err(db_err)?;

        Ok(Some(OrderResponse {
            order: model.into(),
            customer: customer.map(Into::into),
            items,
        }))
    }

    async fn get_order_by_customer(&self, customer_id: Uuid) -> OrderResult<Option<Order>> {
        let model = order::Entity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .one(self.db())
            .await
            .map_err(db_err)?;

        Ok(model.map(Into::into))
    }

    async fn list_orders(&self, page: u64, limit: u64) -> OrderResult<Vec<OrderResponse>> {
        let rows = order::Entity::find()
            .find_also_related(domain_customers::entity::Entity)
            .order_by_desc(order::Column::CreatedAt)
            .limit(limit)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .all(self.db())
            .await
            .map_err(db_err)?;

        let mut responses = Vec::with_capacity(rows.len());
        for (model, customer) in rows {
            let items = Self::load_items_with_products(self.db(), model.id)
                .await
                .map_err(db_err)?;
            responses.push(OrderResponse {
                order: model.into(),
                customer: customer.map(Into::into),
                items,
            });
        }

        Ok(responses)
    }

    async fn update_order(
        &self,
        order: Order,
        replace_item_ids: Option<&[Uuid]>,
    ) -> OrderResult<Order> {
        let txn = self.db().begin().await.map_err(db_err)?;

        let order_id = order.id;

        if order::Entity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_none()
        {
            txn.rollback().await.map_err(db_err)?;
            return Err(OrderError::OrderNotFound(order_id));
        }

        order::ActiveModel::from(order)
            .update(&txn)
            .await
            .map_err(db_err)?;

        if let Some(item_ids) = replace_item_ids {
            // Detach the current set, then attach the replacement
            order_item::Entity::update_many()
                .col_expr(order_item::Column::OrderId, Expr::value(None::<Uuid>))
                .filter(order_item::Column::OrderId.eq(order_id))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            Self::attach_items(&txn, order_id, item_ids).await?;
        }

        let model = Self::recompute_total(&txn, order_id).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(order_id = %order_id, "Updated order");
        Ok(model.into())
    }

    async fn delete_order(&self, id: Uuid) -> OrderResult<bool> {
        let txn = self.db().begin().await.map_err(db_err)?;

        // Orphan the items rather than deleting purchase history
        order_item::Entity::update_many()
            .col_expr(order_item::Column::OrderId, Expr::value(None::<Uuid>))
            .filter(order_item::Column::OrderId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let result = order::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        if result.rows_affected > 0 {
            tracing::info!(order_id = %id, "Deleted order");
        }
        Ok(result.rows_affected > 0)
    }

    async fn attach_item(&self, order_id: Uuid, item_id: Uuid) -> OrderResult<Order> {
        let txn = self.db().begin().await.map_err(db_err)?;

        if order::Entity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_none()
        {
            txn.rollback().await.map_err(db_err)?;
            return Err(OrderError::OrderNotFound(order_id));
        }

        let Some(item) = order_item::Entity::find_by_id(item_id)
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            txn.rollback().await.map_err(db_err)?;
            return Err(OrderError::ItemNotFound(item_id));
        };

        let mut item: OrderItem = item.into();
        item.order_id = Some(order_id);
        order_item::ActiveModel::from(item)
            .update(&txn)
            .await
            .map_err(db_err)?;

        let model = Self::recompute_total(&txn, order_id).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(model.into())
    }

    async fn detach_item(&self, order_id: Uuid, item_id: Uuid) -> OrderResult<Order> {
        let txn = self.db().begin().await.map_err(db_err)?;

        if order::Entity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_none()
        {
            txn.rollback().await.map_err(db_err)?;
            return Err(OrderError::OrderNotFound(order_id));
        }

        let item = order_item::Entity::find_by_id(item_id)
            .filter(order_item::Column::OrderId.eq(order_id))
            .one(&txn)
            .await
            .map_err(db_err)?;

        let Some(item) = item else {
            txn.rollback().await.map_err(db_err)?;
            return Err(OrderError::ItemNotInOrder(item_id));
        };

        let mut item: OrderItem = item.into();
        item.order_id = None;
        order_item::ActiveModel::from(item)
            .update(&txn)
            .await
            .map_err(db_err)?;

        let model = Self::recompute_total(&txn, order_id).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(model.into())
    }

    async fn create_item(&self, item: OrderItem) -> OrderResult<OrderItem> {
        let model = order_item::ActiveModel::from(item)
            .insert(self.db())
            .await
            .map_err(db_err)?;

        tracing::info!(item_id = %model.id, "Created order item");
        Ok(model.into())
    }

    async fn get_item(&self, id: Uuid) -> OrderResult<Option<OrderItem>> {
        let model = order_item::Entity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(db_err)?;

        Ok(model.map(Into::into))
    }

    async fn get_item_with_relations(&self, id: Uuid) -> OrderResult<Option<OrderItemResponse>> {
        let Some((model, product)) = order_item::Entity::find_by_id(id)
            .find_also_related(domain_catalog::entity::product::Entity)
            .one(self.db())
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let item: OrderItem = model.into();
        let parent = match item.order_id {
            Some(order_id) => order::Entity::find_by_id(order_id)
                .one(self.db())
                .await
                .map_err(db_err)?
                .map(Into::into),
            None => None,
        };

        Ok(Some(OrderItemResponse {
            item,
            product: product.map(Into::into),
            order: parent,
        }))
    }

    async fn get_items(&self, ids: &[Uuid]) -> OrderResult<Vec<OrderItem>> {
        let models = order_item::Entity::find()
            .filter(order_item::Column::Id.is_in(ids.to_vec()))
            .all(self.db())
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn items_for_order(&self, order_id: Uuid) -> OrderResult<Vec<OrderItem>> {
        let models = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(self.db())
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_items(&self) -> OrderResult<Vec<OrderItemResponse>> {
        let rows = order_item::Entity::find()
            .find_also_related(domain_catalog::entity::product::Entity)
            .order_by_asc(order_item::Column::Id)
            .all(self.db())
            .await
            .map_err(db_err)?;

        let mut responses = Vec::with_capacity(rows.len());
        for (model, product) in rows {
            let item: OrderItem = model.into();
            let parent = match item.order_id {
                Some(order_id) => order::Entity::find_by_id(order_id)
                    .one(self.db())
                    .await
                    .map_err(db_err)?
                    .map(Into::into),
                None => None,
            };
            responses.push(OrderItemResponse {
                item,
                product: product.map(Into::into),
                order: parent,
            });
        }

        Ok(responses)
    }

    async fn update_item(&self, item: OrderItem) -> OrderResult<OrderItem> {
        let txn = self.db().begin().await.map_err(db_err)?;

        if order_item::Entity::find_by_id(item.id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_none()
        {
            txn.rollback().await.map_err(db_err)?;
            return Err(OrderError::ItemNotFound(item.id));
        }

        let order_id = item.order_id;
        let model = order_item::ActiveModel::from(item)
            .update(&txn)
            .await
            .map_err(db_err)?;

        // The parent total follows the item in the same transaction
        if let Some(order_id) = order_id {
            Self::recompute_total(&txn, order_id).await.map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(model.into())
    }

    async fn delete_item(&self, id: Uuid) -> OrderResult<bool> {
        let txn = self.db().begin().await.map_err(db_err)?;

        let Some(model) = order_item::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            txn.rollback().await.map_err(db_err)?;
            return Ok(false);
        };

        let order_id = model.order_id;

        order_item::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if let Some(order_id) = order_id {
            Self::recompute_total(&txn, order_id).await.map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;

        tracing::info!(item_id = %id, "Deleted order item");
        Ok(true)
    }
}
