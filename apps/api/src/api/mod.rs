//! Route composition: domain routers behind the JWT guard.

use axum::routing::get;
use axum::{extract::State, middleware, Json, Router};
use axum_helpers::{
    jwt_auth_middleware, require_roles, run_health_checks, HealthCheckFuture, JwtAuth,
    ROLE_ADMIN, ROLE_CUSTOMER,
};
use domain_billing::{BillingService, PgBillingRepository};
use domain_catalog::{CatalogService, PgCatalogRepository};
use domain_customers::{CustomerService, PgCustomerRepository};
use domain_orders::{OrderService, PgOrderRepository};
use domain_users::auth_handlers::AuthState;
use domain_users::{PgUserRepository, UserService};
use domain_warranties::{PgWarrantyRepository, WarrantyService};
use std::sync::Arc;

use crate::state::AppState;

pub type Users = UserService<PgUserRepository>;
pub type Catalog = CatalogService<PgCatalogRepository>;
pub type Orders = OrderService<PgOrderRepository, PgCatalogRepository, PgCustomerRepository>;
pub type Billing = BillingService<PgBillingRepository, PgOrderRepository, PgWarrantyRepository>;

/// The domain services wired against PostgreSQL and Redis.
pub struct Services {
    pub auth: AuthState<PgUserRepository>,
    pub users: Users,
    pub customers: CustomerService<PgCustomerRepository>,
    pub catalog: Catalog,
    pub warranties: WarrantyService<PgWarrantyRepository>,
    pub orders: Orders,
    pub billing: Billing,
}

/// Compose the API router.
///
/// `/auth` stays public (registration, OTP, login, token refresh); everything
/// else sits behind the JWT guard - there is no anonymous fallthrough.
pub fn routes(services: Services, jwt_auth: JwtAuth) -> Router {
    let catalog = Arc::new(services.catalog);
    let orders = Arc::new(services.orders);
    let billing = Arc::new(services.billing);

    let protected = Router::new()
        .nest("/users", domain_users::handlers::router(services.users))
        .nest(
            "/customers",
            domain_customers::handlers::router(services.customers),
        )
        .nest(
            "/categories",
            domain_catalog::handlers::categories_router(catalog.clone()),
        )
        .nest(
            "/products",
            domain_catalog::handlers::products_router(catalog.clone()),
        )
        .nest("/images", domain_catalog::handlers::images_router(catalog))
        .nest(
            "/warranties",
            domain_warranties::handlers::router(services.warranties),
        )
        .nest(
            "/orders",
            domain_orders::handlers::orders_router(orders.clone()),
        )
        .nest(
            "/order-items",
            domain_orders::handlers::order_items_router(orders),
        )
        .nest(
            "/payments",
            domain_billing::handlers::payments_router(billing.clone()),
        )
        .nest(
            "/receipts",
            domain_billing::handlers::receipts_router(billing),
        )
        // Every guarded route requires a token carrying a known role claim;
        // routes with stricter allowlists check again in their handlers
        .layer(middleware::from_fn(require_roles(&[
            ROLE_CUSTOMER,
            ROLE_ADMIN,
        ])))
        .layer(middleware::from_fn_with_state(
            jwt_auth,
            jwt_auth_middleware,
        ));

    Router::new()
        .nest("/auth", domain_users::auth_handlers::router(services.auth))
        .merge(protected)
}

/// Readiness endpoint checking the database and cache connections.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(state)
}

async fn ready_handler(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![
        (
            "database",
            Box::pin(async { database::postgres::check_database(&state.db).await }),
        ),
        (
            "cache",
            Box::pin(async { database::redis::check_redis(&state.redis).await }),
        ),
    ];

    match run_health_checks(checks).await {
        Ok((status, Json(body))) => (status, Json(body)),
        Err((status, Json(body))) => (status, Json(body)),
    }
}
