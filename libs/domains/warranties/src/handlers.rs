use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    JwtClaims, UuidPath, ValidatedJson, ROLE_ADMIN,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{WarrantyError, WarrantyResult};
use crate::models::{ClaimResponse, CreateWarranty, Warranty, WarrantyFilter, WarrantyValidity};
use crate::repository::WarrantyRepository;
use crate::service::WarrantyService;

const TAG: &str = "warranties";

/// OpenAPI documentation for the Warranties API
#[derive(OpenApi)]
#[openapi(
    paths(create_warranty, list_warranties, get_warranty, validate_warranty, claim_warranty),
    components(
        schemas(Warranty, CreateWarranty, WarrantyValidity, ClaimResponse, ListWarrantiesResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Warranty interval and claim endpoints"))
)]
pub struct ApiDoc;

/// Create the warranties router. Authentication is layered on by the app;
/// creation additionally requires the admin role.
pub fn router<R: WarrantyRepository + 'static>(service: WarrantyService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_warranties).post(create_warranty))
        .route("/{id}", get(get_warranty))
        .route("/{product_id}/validate", get(validate_warranty))
        .route("/{product_id}/claim", post(claim_warranty))
        .with_state(shared_service)
}

/// Paginated warranty listing envelope
#[derive(Debug, Serialize, utoipa::ToSchema)]
struct ListWarrantiesResponse {
    data: Vec<Warranty>,
    total: u64,
    page: u64,
    limit: u64,
}

/// Create a warranty (admin only); overlapping intervals are rejected
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateWarranty,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Warranty created", body = Warranty),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_warranty<R: WarrantyRepository>(
    State(service): State<Arc<WarrantyService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<CreateWarranty>,
) -> WarrantyResult<impl IntoResponse> {
    if !claims.has_any_role(&[ROLE_ADMIN]) {
        return Err(WarrantyError::Forbidden);
    }

    let warranty = service.create_warranty(input).await?;
    Ok((StatusCode::CREATED, Json(warranty)))
}

/// List warranties
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(WarrantyFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated warranties", body = ListWarrantiesResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_warranties<R: WarrantyRepository>(
    State(service): State<Arc<WarrantyService<R>>>,
    Query(filter): Query<WarrantyFilter>,
) -> WarrantyResult<Json<ListWarrantiesResponse>> {
    let (data, total) = service.list_warranties(filter).await?;
    Ok(Json(ListWarrantiesResponse {
        data,
        total,
        page: filter.page,
        limit: filter.limit,
    }))
}

/// Get a warranty by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Warranty ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Warranty found", body = Warranty),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_warranty<R: WarrantyRepository>(
    State(service): State<Arc<WarrantyService<R>>>,
    UuidPath(id): UuidPath,
) -> WarrantyResult<Json<Warranty>> {
    Ok(Json(service.get_warranty(id).await?))
}

/// Check whether a product's warranty is still valid
#[utoipa::path(
    get,
    path = "/{product_id}/validate",
    tag = TAG,
    params(("product_id" = Uuid, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Validity of the product's warranty", body = WarrantyValidity),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn validate_warranty<R: WarrantyRepository>(
    State(service): State<Arc<WarrantyService<R>>>,
    UuidPath(product_id): UuidPath,
) -> WarrantyResult<Json<WarrantyValidity>> {
    Ok(Json(service.validate_warranty(product_id).await?))
}

/// File a claim against a product's warranty
#[utoipa::path(
    post,
    path = "/{product_id}/claim",
    tag = TAG,
    params(("product_id" = Uuid, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Claim outcome", body = ClaimResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn claim_warranty<R: WarrantyRepository>(
    State(service): State<Arc<WarrantyService<R>>>,
    UuidPath(product_id): UuidPath,
) -> WarrantyResult<Json<ClaimResponse>> {
    let message = service.claim_warranty(product_id).await?;
    Ok(Json(ClaimResponse { message }))
}
