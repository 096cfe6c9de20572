use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    JwtClaims, UuidPath, ValidatedJson, ROLE_ADMIN,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{CustomerError, CustomerResult};
use crate::models::{CreateCustomer, Customer, CustomerFilter, UpdateCustomer};
use crate::repository::CustomerRepository;
use crate::service::CustomerService;

const TAG: &str = "customers";

/// OpenAPI documentation for the Customers API
#[derive(OpenApi)]
#[openapi(
    paths(create_customer, list_customers, get_customer, update_customer, delete_customer),
    components(
        schemas(Customer, CreateCustomer, UpdateCustomer, ListCustomersResponse),
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
    tags(
        (name = TAG, description = "Customer profile endpoints")
    )
)]
pub struct ApiDoc;

/// Create the customers router. Authentication is layered on by the app;
/// listing and deletion additionally require the admin role.
pub fn router<R: CustomerRepository + 'static>(service: CustomerService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        .with_state(shared_service)
}

/// Paginated customer listing envelope
#[derive(Debug, Serialize, utoipa::ToSchema)]
struct ListCustomersResponse {
    data: Vec<Customer>,
    total: u64,
    page: u64,
    limit: u64,
}

/// Create a customer profile
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateCustomer,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCustomer>,
) -> CustomerResult<impl IntoResponse> {
    let customer = service.create_customer(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// List customers (admin only)
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(CustomerFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated customers", body = ListCustomersResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_customers<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    Query(filter): Query<CustomerFilter>,
) -> CustomerResult<Json<ListCustomersResponse>> {
    if !claims.has_any_role(&[ROLE_ADMIN]) {
        return Err(CustomerError::Forbidden);
    }

    let page = filter.page;
    let limit = filter.limit;
    let (data, total) = service.list_customers(filter).await?;

    Ok(Json(ListCustomersResponse {
        data,
        total,
        page,
        limit,
    }))
}

/// Get a customer by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Customer ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Customer found", body = Customer),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    UuidPath(id): UuidPath,
) -> CustomerResult<Json<Customer>> {
    let customer = service.get_customer(id).await?;
    Ok(Json(customer))
}

/// Update a customer
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = UpdateCustomer,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCustomer>,
) -> CustomerResult<Json<Customer>> {
    let customer = service.update_customer(id, input).await?;
    Ok(Json(customer))
}

/// Delete a customer (admin only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Customer ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_customer<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> CustomerResult<impl IntoResponse> {
    if !claims.has_any_role(&[ROLE_ADMIN]) {
        return Err(CustomerError::Forbidden);
    }

    service.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
