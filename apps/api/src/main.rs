use axum_helpers::{create_production_app, create_router, health_router, JwtAuth};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::redis::CacheStore;
use domain_billing::{BillingService, PgBillingRepository};
use domain_catalog::{CatalogService, PgCatalogRepository};
use domain_customers::{CustomerService, PgCustomerRepository};
use domain_notifications::{MailService, SmtpProvider};
use domain_orders::{OrderService, PgOrderRepository};
use domain_users::auth_handlers::AuthState;
use domain_users::{PgUserRepository, UserService};
use domain_warranties::{PgWarrantyRepository, WarrantyService};
use migration::Migrator;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Colored error reports before any fallible operation
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    // Database connections come up concurrently
    let postgres_future = async {
        database::postgres::connect_from_config_with_retry(config.database.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
    };

    let redis_future = async {
        database::redis::connect_from_config_with_retry(&config.redis, None)
            .await
            .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))
    };

    let (db, redis) = tokio::try_join!(postgres_future, redis_future)?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let jwt_auth = JwtAuth::new(&config.jwt);
    let cache = CacheStore::new(redis.clone(), config.redis.cache_ttl_secs);

    let mail = MailService::new(
        Arc::new(
            SmtpProvider::new(config.smtp.clone())
                .map_err(|e| eyre::eyre!("SMTP transport setup failed: {}", e))?,
        ),
        config.frontend_url.clone(),
    )
    .map_err(|e| eyre::eyre!("Mail templates failed to initialize: {}", e))?;

    let users = UserService::with_cache(PgUserRepository::new(db.clone()), cache.clone());

    let services = api::Services {
        auth: AuthState {
            service: users.clone(),
            jwt_auth: jwt_auth.clone(),
            mail,
        },
        users,
        customers: CustomerService::new(PgCustomerRepository::new(db.clone())),
        catalog: CatalogService::with_cache(
            PgCatalogRepository::new(db.clone()),
            cache.clone(),
            config.storage.upload_dir.clone(),
        ),
        warranties: WarrantyService::new(PgWarrantyRepository::new(db.clone())),
        orders: OrderService::with_cache(
            PgOrderRepository::new(db.clone()),
            PgCatalogRepository::new(db.clone()),
            PgCustomerRepository::new(db.clone()),
            cache,
        ),
        billing: BillingService::new(
            PgBillingRepository::new(db.clone()),
            PgOrderRepository::new(db.clone()),
            PgWarrantyRepository::new(db.clone()),
            config.storage.receipt_dir.clone(),
        ),
    };

    let state = AppState {
        config,
        db,
        redis,
        jwt_auth: jwt_auth.clone(),
    };

    let api_routes = api::routes(services, jwt_auth);

    // create_router adds docs and cross-cutting middleware
    let router = create_router::<openapi::ApiDoc>(api_routes).await?;

    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting storefront API with graceful shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");

            tokio::join!(
                async {
                    match state.db.close().await {
                        Ok(_) => info!("PostgreSQL connection closed successfully"),
                        Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
                    }
                },
                async {
                    // Redis ConnectionManager closes on drop
                    drop(state.redis);
                    info!("Redis connection closed successfully");
                }
            );
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Storefront API shutdown complete");
    Ok(())
}
