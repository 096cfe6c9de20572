use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    JwtClaims, UuidPath, ValidatedJson, ROLE_ADMIN,
};
use domain_catalog::ProductRepository;
use domain_customers::CustomerRepository;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    CreateOrder, CreateOrderItem, Order, OrderFilter, OrderItem, OrderItemResponse, OrderResponse,
    UpdateOrder, UpdateOrderItem,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

const ORDERS_TAG: &str = "orders";
const ORDER_ITEMS_TAG: &str = "order-items";

fn require_admin(claims: &JwtClaims) -> OrderResult<()> {
    if claims.has_any_role(&[ROLE_ADMIN]) {
        Ok(())
    } else {
        Err(OrderError::Forbidden)
    }
}

/// OpenAPI documentation for the Orders API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_order,
        list_orders,
        get_order,
        update_order,
        delete_order,
        add_order_item,
        remove_order_item,
    ),
    components(
        schemas(Order, OrderResponse, CreateOrder, UpdateOrder),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = ORDERS_TAG, description = "Order management endpoints"))
)]
pub struct OrdersApiDoc;

/// OpenAPI documentation for the OrderItems API
#[derive(OpenApi)]
#[openapi(
    paths(create_order_item, list_order_items, get_order_item, update_order_item, delete_order_item),
    components(
        schemas(OrderItem, OrderItemResponse, CreateOrderItem, UpdateOrderItem),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = ORDER_ITEMS_TAG, description = "Order item endpoints"))
)]
pub struct OrderItemsApiDoc;

/// Router for `/orders`
pub fn orders_router<R, P, C>(service: Arc<OrderService<R, P, C>>) -> Router
where
    R: OrderRepository + 'static,
    P: ProductRepository + 'static,
    C: CustomerRepository + 'static,
{
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/{id}",
            get(get_order).patch(update_order).delete(delete_order),
        )
        .route(
            "/{id}/items/{item_id}",
            post(add_order_item).delete(remove_order_item),
        )
        .with_state(service)
}

/// Router for `/order-items`
pub fn order_items_router<R, P, C>(service: Arc<OrderService<R, P, C>>) -> Router
where
    R: OrderRepository + 'static,
    P: ProductRepository + 'static,
    C: CustomerRepository + 'static,
{
    Router::new()
        .route("/", get(list_order_items))
        // POST interprets the segment as a product id; the rest as an item id
        .route(
            "/{id}",
            post(create_order_item)
                .get(get_order_item)
                .patch(update_order_item)
                .delete(delete_order_item),
        )
        .with_state(service)
}

// Orders

/// Create an order from previously created items
#[utoipa::path(
    post,
    path = "",
    tag = ORDERS_TAG,
    request_body = CreateOrder,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> OrderResult<impl IntoResponse>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    let order = service.create_order(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders with relations (admin only)
#[utoipa::path(
    get,
    path = "",
    tag = ORDERS_TAG,
    params(OrderFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of orders", body = Vec<OrderResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    Extension(claims): Extension<JwtClaims>,
    Query(filter): Query<OrderFilter>,
) -> OrderResult<Json<Vec<OrderResponse>>>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    require_admin(&claims)?;
    Ok(Json(service.list_orders(filter).await?))
}

/// Get an order by ID with relations (admin only)
#[utoipa::path(
    get,
    path = "/{id}",
    tag = ORDERS_TAG,
    params(("id" = Uuid, Path, description = "Order ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<OrderResponse>>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    require_admin(&claims)?;
    Ok(Json(service.get_order(id).await?))
}

/// Update an order; replacing the item set recomputes the total
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = ORDERS_TAG,
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrder,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrder>,
) -> OrderResult<Json<Order>>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    Ok(Json(service.update_order(id, input).await?))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = ORDERS_TAG,
    params(("id" = Uuid, Path, description = "Order ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_order<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    UuidPath(id): UuidPath,
) -> OrderResult<impl IntoResponse>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    service.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach an existing item to an order and recompute the total
#[utoipa::path(
    post,
    path = "/{id}/items/{item_id}",
    tag = ORDERS_TAG,
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("item_id" = Uuid, Path, description = "Order item ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item attached", body = Order),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_order_item<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> OrderResult<Json<Order>>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    Ok(Json(service.add_order_item(id, item_id).await?))
}

/// Detach an item from an order and recompute the total
#[utoipa::path(
    delete,
    path = "/{id}/items/{item_id}",
    tag = ORDERS_TAG,
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("item_id" = Uuid, Path, description = "Order item ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item detached", body = Order),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_order_item<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> OrderResult<Json<Order>>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    Ok(Json(service.remove_order_item(id, item_id).await?))
}

// Order items

/// Create a detached order item for a product
#[utoipa::path(
    post,
    path = "/{product_id}",
    tag = ORDER_ITEMS_TAG,
    params(("product_id" = Uuid, Path, description = "Product ID")),
    request_body = CreateOrderItem,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Order item created", body = OrderItem),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order_item<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    UuidPath(product_id): UuidPath,
    ValidatedJson(input): ValidatedJson<CreateOrderItem>,
) -> OrderResult<impl IntoResponse>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    let item = service.create_order_item(product_id, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// List order items with relations
#[utoipa::path(
    get,
    path = "",
    tag = ORDER_ITEMS_TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of order items", body = Vec<OrderItemResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_order_items<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
) -> OrderResult<Json<Vec<OrderItemResponse>>>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    Ok(Json(service.list_order_items().await?))
}

/// Get an order item with relations
#[utoipa::path(
    get,
    path = "/{id}",
    tag = ORDER_ITEMS_TAG,
    params(("id" = Uuid, Path, description = "Order item ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order item found", body = OrderItemResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order_item<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<OrderItemResponse>>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    Ok(Json(service.get_order_item(id).await?))
}

/// Update an order item; the parent total follows in the same transaction
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = ORDER_ITEMS_TAG,
    params(("id" = Uuid, Path, description = "Order item ID")),
    request_body = UpdateOrderItem,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order item updated", body = OrderItem),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order_item<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrderItem>,
) -> OrderResult<Json<OrderItem>>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    Ok(Json(service.update_order_item(id, input).await?))
}

/// Delete an order item; the parent total follows in the same transaction
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = ORDER_ITEMS_TAG,
    params(("id" = Uuid, Path, description = "Order item ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted order item", body = OrderItem),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_order_item<R, P, C>(
    State(service): State<Arc<OrderService<R, P, C>>>,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<OrderItem>>
where
    R: OrderRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    Ok(Json(service.delete_order_item(id).await?))
}
