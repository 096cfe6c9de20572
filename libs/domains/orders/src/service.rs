use database::redis::CacheStore;
use domain_catalog::ProductRepository;
use domain_customers::CustomerRepository;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    CreateOrder, CreateOrderItem, Order, OrderFilter, OrderItem, OrderItemResponse, OrderResponse,
    UpdateOrder, UpdateOrderItem,
};
use crate::repository::OrderRepository;

/// Service layer for Orders and OrderItems.
///
/// Order reads go through the Redis cache-aside layer when one is configured;
/// every mutation invalidates the affected keys. Total recomputation happens
/// in the repository, inside the same transaction as the item writes.
#[derive(Clone)]
pub struct OrderService<R, P, C> {
    repository: Arc<R>,
    products: Arc<P>,
    customers: Arc<C>,
    cache: Option<CacheStore>,
}

impl<R, P, C> OrderService<R, P, C>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    pub fn new(repository: R, products: P, customers: C) -> Self {
        Self {
            repository: Arc::new(repository),
            products: Arc::new(products),
            customers: Arc::new(customers),
            cache: None,
        }
    }

    pub fn with_cache(repository: R, products: P, customers: C, cache: CacheStore) -> Self {
        Self {
            repository: Arc::new(repository),
            products: Arc::new(products),
            customers: Arc::new(customers),
            cache: Some(cache),
        }
    }

    // Orders

    pub async fn create_order(&self, input: CreateOrder) -> OrderResult<Order> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let customer = self
            .customers
            .get_by_id(input.customer_id)
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?;
        if customer.is_none() {
            return Err(OrderError::CustomerNotFound(input.customer_id));
        }

        if self
            .repository
            .get_order_by_customer(input.customer_id)
            .await?
            .is_some()
        {
            return Err(OrderError::DuplicateOrderForCustomer);
        }

        let items = self.repository.get_items(&input.order_item_ids).await?;
        if items.len() != input.order_item_ids.len() {
            return Err(OrderError::ItemsMissing);
        }

        let now = chrono::Utc::now();
        let order = Order {
            id: Uuid::now_v7(),
            customer_id: input.customer_id,
            total: rust_decimal::Decimal::ZERO,
            status: input.status,
            payment_method: input.payment_method,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repository
            .insert_order_with_items(order, &input.order_item_ids)
            .await?;

        self.invalidate_order_cache(None).await;
        Ok(created)
    }

    pub async fn get_order(&self, id: Uuid) -> OrderResult<OrderResponse> {
        let key = CacheStore::entity_key("order", id);

        if let Some(cache) = &self.cache {
            if let Some(order) = cache.get_json::<OrderResponse>(&key).await {
                return Ok(order);
            }
        }

        let order = self
            .repository
            .get_order_with_relations(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;

        if let Some(cache) = &self.cache {
            cache.set_json(&key, &order).await;
        }

        Ok(order)
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> OrderResult<Vec<OrderResponse>> {
        let key = CacheStore::list_key("orders", filter.page, filter.limit);

        if let Some(cache) = &self.cache {
            if let Some(orders) = cache.get_json::<Vec<OrderResponse>>(&key).await {
                return Ok(orders);
            }
        }

        let orders = self
            .repository
            .list_orders(filter.page, filter.limit)
            .await?;

        if let Some(cache) = &self.cache {
            cache.set_json(&key, &orders).await;
        }

        Ok(orders)
    }

    pub async fn update_order(&self, id: Uuid, input: UpdateOrder) -> OrderResult<Order> {
        let mut order = self
            .repository
            .get_order(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;

        if let Some(status) = input.status {
            order.status = status;
        }
        if let Some(payment_method) = input.payment_method {
            order.payment_method = payment_method;
        }
        order.updated_at = chrono::Utc::now();

        let updated = self
            .repository
            .update_order(order, input.item_ids.as_deref())
            .await?;

        self.invalidate_order_cache(Some(id)).await;
        Ok(updated)
    }

    pub async fn delete_order(&self, id: Uuid) -> OrderResult<()> {
        if !self.repository.delete_order(id).await? {
            return Err(OrderError::OrderNotFound(id));
        }

        self.invalidate_order_cache(Some(id)).await;
        Ok(())
    }

    /// Attach an existing detached item; the total is recomputed with the
    /// attach in one transaction.
    pub async fn add_order_item(&self, order_id: Uuid, item_id: Uuid) -> OrderResult<Order> {
        let order = self.repository.attach_item(order_id, item_id).await?;
        self.invalidate_order_cache(Some(order_id)).await;
        Ok(order)
    }

    /// Detach an item; the total is recomputed with the detach in one
    /// transaction.
    pub async fn remove_order_item(&self, order_id: Uuid, item_id: Uuid) -> OrderResult<Order> {
        let order = self.repository.detach_item(order_id, item_id).await?;
        self.invalidate_order_cache(Some(order_id)).await;
        Ok(order)
    }

    // Order items

    /// Create a detached order item against a product, pinning the product's
    /// current price.
    pub async fn create_order_item(
        &self,
        product_id: Uuid,
        input: CreateOrderItem,
    ) -> OrderResult<OrderItem> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let product = self
            .products
            .get_product(product_id)
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?
            .ok_or(OrderError::ProductNotFound(product_id))?;

        if input.quantity > product.stock {
            return Err(OrderError::InsufficientStock);
        }

        if input.price != product.price {
            return Err(OrderError::PriceMismatch);
        }

        self.repository
            .create_item(OrderItem {
                id: Uuid::now_v7(),
                order_id: None,
                product_id,
                quantity: input.quantity,
                price: product.price,
            })
            .await
    }

    pub async fn get_order_item(&self, id: Uuid) -> OrderResult<OrderItemResponse> {
        self.repository
            .get_item_with_relations(id)
            .await?
            .ok_or(OrderError::ItemNotFound(id))
    }

    pub async fn list_order_items(&self) -> OrderResult<Vec<OrderItemResponse>> {
        self.repository.list_items().await
    }

    pub async fn update_order_item(
        &self,
        id: Uuid,
        input: UpdateOrderItem,
    ) -> OrderResult<OrderItem> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let mut item = self
            .repository
            .get_item(id)
            .await?
            .ok_or(OrderError::ItemNotFound(id))?;

        if let Some(quantity) = input.quantity {
            item.quantity = quantity;
        }
        if let Some(price) = input.price {
            item.price = price;
        }

        let parent = item.order_id;
        let updated = self.repository.update_item(item).await?;

        self.invalidate_order_cache(parent).await;
        Ok(updated)
    }

    pub async fn delete_order_item(&self, id: Uuid) -> OrderResult<OrderItem> {
        let item = self
            .repository
            .get_item(id)
            .await?
            .ok_or(OrderError::ItemNotFound(id))?;

        if !self.repository.delete_item(id).await? {
            return Err(OrderError::ItemNotFound(id));
        }

        self.invalidate_order_cache(item.order_id).await;
        Ok(item)
    }

    // Cache invalidation

    async fn invalidate_order_cache(&self, id: Option<Uuid>) {
        if let Some(cache) = &self.cache {
            if let Some(id) = id {
                cache.del(&CacheStore::entity_key("order", id)).await;
            }
            cache.del_prefix("orders:all:").await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, PaymentMethod};
    use crate::repository::InMemoryOrderRepository;
    use domain_catalog::{
        CategoryRepository, CreateCategory, InMemoryCatalogRepository, Product,
    };
    use domain_customers::{CreateCustomer, InMemoryCustomerRepository};
    use rust_decimal::Decimal;

    type TestService =
        OrderService<InMemoryOrderRepository, InMemoryCatalogRepository, InMemoryCustomerRepository>;

    struct Fixture {
        service: TestService,
        catalog: InMemoryCatalogRepository,
        customers: InMemoryCustomerRepository,
    }

    fn fixture() -> Fixture {
        let catalog = InMemoryCatalogRepository::new();
        let customers = InMemoryCustomerRepository::new();
        Fixture {
            service: OrderService::new(
                InMemoryOrderRepository::new(),
                catalog.clone(),
                customers.clone(),
            ),
            catalog,
            customers,
        }
    }

    async fn seeded_product(fixture: &Fixture, price_cents: i64, stock: i32) -> Product {
        let category = fixture
            .catalog
            .create_category(domain_catalog::Category::new(CreateCategory {
                name: format!("cat-{}", Uuid::now_v7()),
                description: String::new(),
            }))
            .await
            .unwrap();

        let now = chrono::Utc::now();
        fixture
            .catalog
            .create_product(Product {
                id: Uuid::now_v7(),
                name: "Lamp".to_string(),
                description: String::new(),
                price: Decimal::new(price_cents, 2),
                stock,
                category_id: category.id,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    async fn seeded_customer(fixture: &Fixture) -> Uuid {
        fixture
            .customers
            .create(CreateCustomer {
                user_id: Uuid::now_v7(),
                address: "Main St 1".to_string(),
                phone: "+1 555 0100".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_item_pins_product_price() {
        let fx = fixture();
        let product = seeded_product(&fx, 1999, 5).await;

        let item = fx
            .service
            .create_order_item(
                product.id,
                CreateOrderItem {
                    quantity: 2,
                    price: Decimal::new(1999, 2),
                },
            )
            .await
            .unwrap();

        assert_eq!(item.price, product.price);
        assert!(item.order_id.is_none());
    }

    #[tokio::test]
    async fn test_create_item_rejects_excess_quantity() {
        let fx = fixture();
        let product = seeded_product(&fx, 1999, 1).await;

        let result = fx
            .service
            .create_order_item(
                product.id,
                CreateOrderItem {
                    quantity: 2,
                    price: Decimal::new(1999, 2),
                },
            )
            .await;
        assert!(matches!(result, Err(OrderError::InsufficientStock)));
    }

    #[tokio::test]
    async fn test_create_item_rejects_price_mismatch() {
        let fx = fixture();
        let product = seeded_product(&fx, 1999, 5).await;

        let result = fx
            .service
            .create_order_item(
                product.id,
                CreateOrderItem {
                    quantity: 1,
                    price: Decimal::new(999, 2),
                },
            )
            .await;
        assert!(matches!(result, Err(OrderError::PriceMismatch)));
    }

    #[tokio::test]
    async fn test_create_item_rejects_unknown_product() {
        let fx = fixture();
        let result = fx
            .service
            .create_order_item(
                Uuid::now_v7(),
                CreateOrderItem {
                    quantity: 1,
                    price: Decimal::ONE,
                },
            )
            .await;
        assert!(matches!(result, Err(OrderError::ProductNotFound(_))));
    }

    async fn item_for(fx: &Fixture, price_cents: i64, quantity: i32) -> OrderItem {
        let product = seeded_product(fx, price_cents, 100).await;
        fx.service
            .create_order_item(
                product.id,
                CreateOrderItem {
                    quantity,
                    price: Decimal::new(price_cents, 2),
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_order_computes_total() {
        let fx = fixture();
        let customer_id = seeded_customer(&fx).await;
        let a = item_for(&fx, 1000, 2).await;
        let b = item_for(&fx, 500, 1).await;

        let order = fx
            .service
            .create_order(CreateOrder {
                customer_id,
                order_item_ids: vec![a.id, b.id],
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Card,
            })
            .await
            .unwrap();

        assert_eq!(order.total, Decimal::new(2500, 2));
    }

    #[tokio::test]
    async fn test_create_order_requires_customer() {
        let fx = fixture();
        let a = item_for(&fx, 1000, 1).await;

        let result = fx
            .service
            .create_order(CreateOrder {
                customer_id: Uuid::now_v7(),
                order_item_ids: vec![a.id],
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Card,
            })
            .await;
        assert!(matches!(result, Err(OrderError::CustomerNotFound(_))));
    }

    #[tokio::test]
    async fn test_one_order_per_customer() {
        let fx = fixture();
        let customer_id = seeded_customer(&fx).await;
        let a = item_for(&fx, 1000, 1).await;
        let b = item_for(&fx, 1000, 1).await;

        fx.service
            .create_order(CreateOrder {
                customer_id,
                order_item_ids: vec![a.id],
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Card,
            })
            .await
            .unwrap();

        let result = fx
            .service
            .create_order(CreateOrder {
                customer_id,
                order_item_ids: vec![b.id],
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Card,
            })
            .await;
        assert!(matches!(result, Err(OrderError::DuplicateOrderForCustomer)));
    }

    #[tokio::test]
    async fn test_create_order_with_missing_items() {
        let fx = fixture();
        let customer_id = seeded_customer(&fx).await;
        let a = item_for(&fx, 1000, 1).await;

        let result = fx
            .service
            .create_order(CreateOrder {
                customer_id,
                order_item_ids: vec![a.id, Uuid::now_v7()],
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Card,
            })
            .await;
        assert!(matches!(result, Err(OrderError::ItemsMissing)));
    }

    #[tokio::test]
    async fn test_add_and_remove_item_updates_total() {
        let fx = fixture();
        let customer_id = seeded_customer(&fx).await;
        let a = item_for(&fx, 1000, 2).await;
        let b = item_for(&fx, 300, 3).await;

        let order = fx
            .service
            .create_order(CreateOrder {
                customer_id,
                order_item_ids: vec![a.id],
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Card,
            })
            .await
            .unwrap();
        assert_eq!(order.total, Decimal::new(2000, 2));

        let after_add = fx.service.add_order_item(order.id, b.id).await.unwrap();
        assert_eq!(after_add.total, Decimal::new(2900, 2));

        let after_remove = fx.service.remove_order_item(order.id, a.id).await.unwrap();
        assert_eq!(after_remove.total, Decimal::new(900, 2));
    }

    #[tokio::test]
    async fn test_update_item_quantity_recomputes_parent_total() {
        let fx = fixture();
        let customer_id = seeded_customer(&fx).await;
        let a = item_for(&fx, 1000, 2).await;

        let order = fx
            .service
            .create_order(CreateOrder {
                customer_id,
                order_item_ids: vec![a.id],
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Card,
            })
            .await
            .unwrap();

        fx.service
            .update_order_item(
                a.id,
                UpdateOrderItem {
                    quantity: Some(4),
                    price: None,
                },
            )
            .await
            .unwrap();

        let reloaded = fx.service.get_order(order.id).await.unwrap();
        assert_eq!(reloaded.order.total, Decimal::new(4000, 2));
    }

    #[tokio::test]
    async fn test_delete_item_recomputes_parent_total() {
        let fx = fixture();
        let customer_id = seeded_customer(&fx).await;
        let a = item_for(&fx, 1000, 2).await;
        let b = item_for(&fx, 500, 1).await;

        let order = fx
            .service
            .create_order(CreateOrder {
                customer_id,
                order_item_ids: vec![a.id, b.id],
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Card,
            })
            .await
            .unwrap();

        fx.service.delete_order_item(a.id).await.unwrap();

        let reloaded = fx.service.get_order(order.id).await.unwrap();
        assert_eq!(reloaded.order.total, Decimal::new(500, 2));
    }

    #[tokio::test]
    async fn test_update_order_replaces_item_set() {
        let fx = fixture();
        let customer_id = seeded_customer(&fx).await;
        let a = item_for(&fx, 1000, 1).await;
        let b = item_for(&fx, 700, 1).await;

        let order = fx
            .service
            .create_order(CreateOrder {
                customer_id,
                order_item_ids: vec![a.id],
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Card,
            })
            .await
            .unwrap();

        let updated = fx
            .service
            .update_order(
                order.id,
                UpdateOrder {
                    status: Some(OrderStatus::Processing),
                    payment_method: None,
                    item_ids: Some(vec![b.id]),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Processing);
        assert_eq!(updated.total, Decimal::new(700, 2));
    }

    #[tokio::test]
    async fn test_get_missing_order_is_not_found() {
        let fx = fixture();
        let result = fx.service.get_order(Uuid::now_v7()).await;
        assert!(matches!(result, Err(OrderError::OrderNotFound(_))));
    }
}
