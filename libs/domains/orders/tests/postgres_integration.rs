//! Container-backed integration tests for the order-total cascade.
//!
//! The item mutations and the total rewrite run in one transaction in
//! `PgOrderRepository`; these tests drive the full schema end to end.
//! Requires Docker; run with `cargo test -p domain_orders -- --ignored`.

use domain_catalog::{Category, CategoryRepository, CreateCategory, PgCatalogRepository, Product, ProductRepository};
use domain_customers::{CreateCustomer, CustomerRepository, PgCustomerRepository};
use domain_orders::{Order, OrderItem, OrderRepository, OrderStatus, PaymentMethod, PgOrderRepository};
use domain_users::{PgUserRepository, Role, User, UserRepository};
use rust_decimal::Decimal;
use test_utils::{TestDataBuilder, TestDatabase};
use uuid::Uuid;

struct Fixture {
    orders: PgOrderRepository,
    product_id: Uuid,
    customer_id: Uuid,
    _db: TestDatabase,
}

/// Seed the FK chain: user -> customer, category -> product.
async fn fixture(test_name: &str) -> Fixture {
    let db = TestDatabase::new().await;
    let data = TestDataBuilder::from_test_name(test_name);

    let users = PgUserRepository::new(db.connection.clone());
    let user = users
        .create(User::new(
            "buyer".to_string(),
            data.email("buyer"),
            "argon2-hash-placeholder".to_string(),
            Role::Customer,
        ))
        .await
        .unwrap();

    let customers = PgCustomerRepository::new(db.connection.clone());
    let customer = customers
        .create(CreateCustomer {
            user_id: user.id,
            address: "Main St 1".to_string(),
            phone: "+1 555 0100".to_string(),
        })
        .await
        .unwrap();

    let catalog = PgCatalogRepository::new(db.connection.clone());
    let category = catalog
        .create_category(Category::new(CreateCategory {
            name: data.name("category", "main"),
            description: String::new(),
        }))
        .await
        .unwrap();

    let now = chrono::Utc::now();
    let product = catalog
        .create_product(Product {
            id: Uuid::now_v7(),
            name: "Lamp".to_string(),
            description: String::new(),
            price: Decimal::new(1000, 2),
            stock: 100,
            category_id: category.id,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    Fixture {
        orders: PgOrderRepository::new(db.connection.clone()),
        product_id: product.id,
        customer_id: customer.id,
        _db: db,
    }
}

fn item(product_id: Uuid, quantity: i32, price_cents: i64) -> OrderItem {
    OrderItem {
        id: Uuid::now_v7(),
        order_id: None,
        product_id,
        quantity,
        price: Decimal::new(price_cents, 2),
    }
}

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

#[tokio::test]
#[ignore] // Requires Docker
async fn test_order_total_follows_item_mutations() {
    let fx = fixture("total_cascade").await;

    let a = fx
        .orders
        .create_item(item(fx.product_id, 2, 1000))
        .await
        .unwrap();
    let b = fx
        .orders
        .create_item(item(fx.product_id, 3, 500))
        .await
        .unwrap();

    let created = fx
        .orders
        .insert_order_with_items(order(fx.customer_id), &[a.id])
        .await
        .unwrap();
    assert_eq!(created.total, Decimal::new(2000, 2));

    // Attach recomputes the full sum
    let after_attach = fx.orders.attach_item(created.id, b.id).await.unwrap();
    assert_eq!(after_attach.total, Decimal::new(3500, 2));

    // Quantity change flows into the stored total
    let mut changed = fx.orders.get_item(a.id).await.unwrap().unwrap();
    changed.quantity = 5;
    fx.orders.update_item(changed).await.unwrap();

    let reloaded = fx.orders.get_order(created.id).await.unwrap().unwrap();
    assert_eq!(reloaded.total, Decimal::new(6500, 2));

    // Deleting an item shrinks the total
    fx.orders.delete_item(b.id).await.unwrap();
    let reloaded = fx.orders.get_order(created.id).await.unwrap().unwrap();
    assert_eq!(reloaded.total, Decimal::new(5000, 2));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_order_relations_resolve() {
    let fx = fixture("relations").await;

    let a = fx
        .orders
        .create_item(item(fx.product_id, 1, 1000))
        .await
        .unwrap();
    let created = fx
        .orders
        .insert_order_with_items(order(fx.customer_id), &[a.id])
        .await
        .unwrap();

    let response = fx
        .orders
        .get_order_with_relations(created.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(response.customer.as_ref().map(|c| c.id), Some(fx.customer_id));
    assert_eq!(response.items.len(), 1);
    assert_eq!(
        response.items[0].product.as_ref().map(|p| p.name.as_str()),
        Some("Lamp")
    );
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_detach_orphans_item_and_recomputes() {
    let fx = fixture("detach").await;

    let a = fx
        .orders
        .create_item(item(fx.product_id, 2, 1000))
        .await
        .unwrap();
    let created = fx
        .orders
        .insert_order_with_items(order(fx.customer_id), &[a.id])
        .await
        .unwrap();

    let after_detach = fx.orders.detach_item(created.id, a.id).await.unwrap();
    assert_eq!(after_detach.total, Decimal::ZERO);

    let orphaned = fx.orders.get_item(a.id).await.unwrap().unwrap();
    assert_eq!(orphaned.order_id, None);
}
