use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    order_total, ItemWithProduct, Order, OrderItem, OrderItemResponse, OrderResponse,
};

/// Repository trait for Order and OrderItem persistence.
///
/// Every mutation that touches an order's item set also rewrites
/// `order.total` as the full `sum(quantity * price)` over the attached items,
/// inside the same transaction in the PostgreSQL implementation.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    // Orders

    /// Insert an order and attach the given detached items to it. The total
    /// is computed from the attached items.
    async fn insert_order_with_items(&self, order: Order, item_ids: &[Uuid])
        -> OrderResult<Order>;

    async fn get_order(&self, id: Uuid) -> OrderResult<Option<Order>>;

    async fn get_order_with_relations(&self, id: Uuid) -> OrderResult<Option<OrderResponse>>;

    async fn get_order_by_customer(&self, customer_id: Uuid) -> OrderResult<Option<Order>>;

    async fn list_orders(&self, page: u64, limit: u64) -> OrderResult<Vec<OrderResponse>>;

    /// Persist order field changes; when `replace_item_ids` is given, the
    /// order's item set is replaced and the total recomputed.
    async fn update_order(
        &self,
        order: Order,
        replace_item_ids: Option<&[Uuid]>,
    ) -> OrderResult<Order>;

    async fn delete_order(&self, id: Uuid) -> OrderResult<bool>;

    /// Attach a detached item and recompute the total.
    async fn attach_item(&self, order_id: Uuid, item_id: Uuid) -> OrderResult<Order>;

    /// Detach an item from the order and recompute the total.
    async fn detach_item(&self, order_id: Uuid, item_id: Uuid) -> OrderResult<Order>;

    // Items

    async fn create_item(&self, item: OrderItem) -> OrderResult<OrderItem>;

    async fn get_item(&self, id: Uuid) -> OrderResult<Option<OrderItem>>;

    async fn get_item_with_relations(&self, id: Uuid) -> OrderResult<Option<OrderItemResponse>>;

    /// Fetch items by id; the result may be shorter than `ids` when some are
    /// missing.
    async fn get_items(&self, ids: &[Uuid]) -> OrderResult<Vec<OrderItem>>;

    async fn items_for_order(&self, order_id: Uuid) -> OrderResult<Vec<OrderItem>>;

    async fn list_items(&self) -> OrderResult<Vec<OrderItemResponse>>;

    /// Persist an item change and recompute the parent order's total when the
    /// item is attached.
    async fn update_item(&self, item: OrderItem) -> OrderResult<OrderItem>;

    /// Delete an item and recompute the parent order's total when it was
    /// attached.
    async fn delete_item(&self, id: Uuid) -> OrderResult<bool>;
}

/// In-memory implementation of OrderRepository (for development/testing).
///
/// Relations to customers and products live in other domains; the in-memory
/// variant returns them as `None`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    items: Arc<RwLock<HashMap<Uuid, OrderItem>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn recompute_total(orders: &mut HashMap<Uuid, Order>, items: &HashMap<Uuid, OrderItem>, order_id: Uuid) {
        if let Some(order) = orders.get_mut(&order_id) {
            let attached: Vec<OrderItem> = items
                .values()
                .filter(|i| i.order_id == Some(order_id))
                .cloned()
                .collect();
            order.total = order_total(&attached);
            order.updated_at = chrono::Utc::now();
        }
    }

    fn to_response(order: &Order, items: &HashMap<Uuid, OrderItem>) -> OrderResponse {
        let attached = items
            .values()
            .filter(|i| i.order_id == Some(order.id))
            .cloned()
            .map(|item| ItemWithProduct {
                item,
                product: None,
            })
            .collect();

        OrderResponse {
            order: order.clone(),
            customer: None,
            items: attached,
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert_order_with_items(
        &self,
        mut order: Order,
        item_ids: &[Uuid],
    ) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;
        let mut items = self.items.write().await;

        if item_ids.iter().any(|id| !items.contains_key(id)) {
            return Err(OrderError::ItemsMissing);
        }

        for id in item_ids {
            if let Some(item) = items.get_mut(id) {
                item.order_id = Some(order.id);
            }
        }

        let attached: Vec<OrderItem> = items
            .values()
            .filter(|i| i.order_id == Some(order.id))
            .cloned()
            .collect();
        order.total = order_total(&attached);

        orders.insert(order.id, order.clone());
        tracing::info!(order_id = %order.id, total = %order.total, "Created order");
        Ok(order)
    }

    async fn get_order(&self, id: Uuid) -> OrderResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn get_order_with_relations(&self, id: Uuid) -> OrderResult<Option<OrderResponse>> {
        let orders = self.orders.read().await;
        let items = self.items.read().await;
        Ok(orders.get(&id).map(|o| Self::to_response(o, &items)))
    }

    async fn get_order_by_customer(&self, customer_id: Uuid) -> OrderResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .find(|o| o.customer_id == customer_id)
            .cloned())
    }

    async fn list_orders(&self, page: u64, limit: u64) -> OrderResult<Vec<OrderResponse>> {
        let orders = self.orders.read().await;
        let items = self.items.read().await;

        let mut result: Vec<Order> = orders.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let skip = page.saturating_sub(1).saturating_mul(limit) as usize;
        Ok(result
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .map(|o| Self::to_response(&o, &items))
            .collect())
    }

    async fn update_order(
        &self,
        order: Order,
        replace_item_ids: Option<&[Uuid]>,
    ) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;
        let mut items = self.items.write().await;

        if !orders.contains_key(&order.id) {
            return Err(OrderError::OrderNotFound(order.id));
        }

        orders.insert(order.id, order.clone());

        if let Some(new_ids) = replace_item_ids {
            if new_ids.iter().any(|id| !items.contains_key(id)) {
                return Err(OrderError::ItemsMissing);
            }

            for item in items.values_mut() {
                if item.order_id == Some(order.id) {
                    item.order_id = None;
                }
            }
            for id in new_ids {
                if let Some(item) = items.get_mut(id) {
                    item.order_id = Some(order.id);
                }
            }
        }

        Self::recompute_total(&mut orders, &items, order.id);
        Ok(orders.get(&order.id).cloned().expect("order just updated"))
    }

    async fn delete_order(&self, id: Uuid) -> OrderResult<bool> {
        let mut orders = self.orders.write().await;
        let mut items = self.items.write().await;

        let removed = orders.remove(&id).is_some();
        if removed {
            for item in items.values_mut() {
                if item.order_id == Some(id) {
                    item.order_id = None;
                }
            }
        }
        Ok(removed)
    }

    async fn attach_item(&self, order_id: Uuid, item_id: Uuid) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;
        let mut items = self.items.write().await;

        if !orders.contains_key(&order_id) {
            return Err(OrderError::OrderNotFound(order_id));
        }

        let item = items
            .get_mut(&item_id)
            .ok_or(OrderError::ItemNotFound(item_id))?;
        item.order_id = Some(order_id);

        Self::recompute_total(&mut orders, &items, order_id);
        Ok(orders.get(&order_id).cloned().expect("order exists"))
    }

    async fn detach_item(&self, order_id: Uuid, item_id: Uuid) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;
        let mut items = self.items.write().await;

        if !orders.contains_key(&order_id) {
            return Err(OrderError::OrderNotFound(order_id));
        }

        let item = items
            .get_mut(&item_id)
            .filter(|i| i.order_id == Some(order_id))
            .ok_or(OrderError::ItemNotInOrder(item_id))?;
        item.order_id = None;

        Self::recompute_total(&mut orders, &items, order_id);
        Ok(orders.get(&order_id).cloned().expect("order exists"))
    }

    async fn create_item(&self, item: OrderItem) -> OrderResult<OrderItem> {
        let mut items = self.items.write().await;
        items.insert(item.id, item.clone());
        tracing::info!(item_id = %item.id, "Created order item");
        Ok(item)
    }

    async fn get_item(&self, id: Uuid) -> OrderResult<Option<OrderItem>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn get_item_with_relations(&self, id: Uuid) -> OrderResult<Option<OrderItemResponse>> {
        let items = self.items.read().await;
        let orders = self.orders.read().await;

        Ok(items.get(&id).map(|item| OrderItemResponse {
            item: item.clone(),
            product: None,
            order: item.order_id.and_then(|oid| orders.get(&oid).cloned()),
        }))
    }

    async fn get_items(&self, ids: &[Uuid]) -> OrderResult<Vec<OrderItem>> {
        let items = self.items.read().await;
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }

    async fn items_for_order(&self, order_id: Uuid) -> OrderResult<Vec<OrderItem>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|i| i.order_id == Some(order_id))
            .cloned()
            .collect())
    }

    async fn list_items(&self) -> OrderResult<Vec<OrderItemResponse>> {
        let items = self.items.read().await;
        let orders = self.orders.read().await;

        let mut result: Vec<OrderItem> = items.values().cloned().collect();
        result.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(result
            .into_iter()
            .map(|item| {
                let order = item.order_id.and_then(|oid| orders.get(&oid).cloned());
                OrderItemResponse {
                    item,
                    product: None,
                    order,
                }
            })
            .collect())
    }

    async fn update_item(&self, item: OrderItem) -> OrderResult<OrderItem> {
        let mut orders = self.orders.write().await;
        let mut items = self.items.write().await;

        if !items.contains_key(&item.id) {
            return Err(OrderError::ItemNotFound(item.id));
        }

        items.insert(item.id, item.clone());

        if let Some(order_id) = item.order_id {
            Self::recompute_total(&mut orders, &items, order_id);
        }

        Ok(item)
    }

    async fn delete_item(&self, id: Uuid) -> OrderResult<bool> {
        let mut orders = self.orders.write().await;
        let mut items = self.items.write().await;

        let Some(item) = items.remove(&id) else {
            return Ok(false);
        };

        if let Some(order_id) = item.order_id {
            Self::recompute_total(&mut orders, &items, order_id);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, PaymentMethod};
    use rust_decimal::Decimal;

    fn order(customer_id: Uuid) -> Order {
        let now = chrono::Utc::now();
        Order {
            id: Uuid::now_v7(),
            customer_id,
            total: Decimal::ZERO,
            status: OrderStatus::Pending,
            payment_method: PaymentMethod::Card,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(quantity: i32, price_cents: i64) -> OrderItem {
        OrderItem {
            id: Uuid::now_v7(),
            order_id: None,
            product_id: Uuid::now_v7(),
            quantity,
            price: Decimal::new(price_cents, 2),
        }
    }

    #[tokio::test]
    async fn test_insert_order_computes_total() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.create_item(item(2, 1000)).await.unwrap();
        let b = repo.create_item(item(1, 500)).await.unwrap();

        let created = repo
            .insert_order_with_items(order(Uuid::now_v7()), &[a.id, b.id])
            .await
            .unwrap();

        assert_eq!(created.total, Decimal::new(2500, 2));
    }

    #[tokio::test]
    async fn test_insert_order_with_missing_item_fails() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.create_item(item(2, 1000)).await.unwrap();

        let result = repo
            .insert_order_with_items(order(Uuid::now_v7()), &[a.id, Uuid::now_v7()])
            .await;
        assert!(matches!(result, Err(OrderError::ItemsMissing)));
    }

    #[tokio::test]
    async fn test_attach_and_detach_recompute_total() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.create_item(item(2, 1000)).await.unwrap();
        let b = repo.create_item(item(3, 200)).await.unwrap();

        let created = repo
            .insert_order_with_items(order(Uuid::now_v7()), &[a.id])
            .await
            .unwrap();
        assert_eq!(created.total, Decimal::new(2000, 2));

        let after_attach = repo.attach_item(created.id, b.id).await.unwrap();
        assert_eq!(after_attach.total, Decimal::new(2600, 2));

        let after_detach = repo.detach_item(created.id, a.id).await.unwrap();
        assert_eq!(after_detach.total, Decimal::new(600, 2));
    }

    #[tokio::test]
    async fn test_detach_foreign_item_fails() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.create_item(item(1, 100)).await.unwrap();
        let created = repo
            .insert_order_with_items(order(Uuid::now_v7()), &[a.id])
            .await
            .unwrap();

        let loose = repo.create_item(item(1, 100)).await.unwrap();
        let result = repo.detach_item(created.id, loose.id).await;
        assert!(matches!(result, Err(OrderError::ItemNotInOrder(_))));
    }

    #[tokio::test]
    async fn test_update_item_recomputes_parent_total() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.create_item(item(2, 1000)).await.unwrap();
        let created = repo
            .insert_order_with_items(order(Uuid::now_v7()), &[a.id])
            .await
            .unwrap();

        let mut changed = repo.get_item(a.id).await.unwrap().unwrap();
        changed.quantity = 5;
        repo.update_item(changed).await.unwrap();

        let reloaded = repo.get_order(created.id).await.unwrap().unwrap();
        assert_eq!(reloaded.total, Decimal::new(5000, 2));
    }

    #[tokio::test]
    async fn test_delete_item_recomputes_parent_total() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.create_item(item(2, 1000)).await.unwrap();
        let b = repo.create_item(item(1, 500)).await.unwrap();
        let created = repo
            .insert_order_with_items(order(Uuid::now_v7()), &[a.id, b.id])
            .await
            .unwrap();

        repo.delete_item(a.id).await.unwrap();

        let reloaded = repo.get_order(created.id).await.unwrap().unwrap();
        assert_eq!(reloaded.total, Decimal::new(500, 2));
    }

    #[tokio::test]
    async fn test_replace_item_set_recomputes_total() {
        let repo = InMemoryOrderRepository::new();
        let a = repo.create_item(item(2, 1000)).await.unwrap();
        let b = repo.create_item(item(1, 300)).await.unwrap();
        let created = repo
            .insert_order_with_items(order(Uuid::now_v7()), &[a.id])
            .await
            .unwrap();

        let updated = repo
            .update_order(created.clone(), Some(&[b.id]))
            .await
            .unwrap();

        assert_eq!(updated.total, Decimal::new(300, 2));
        let a_reloaded = repo.get_item(a.id).await.unwrap().unwrap();
        assert_eq!(a_reloaded.order_id, None);
    }
}
