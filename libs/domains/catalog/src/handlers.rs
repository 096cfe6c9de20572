use axum::{
    extract::{Multipart, Query, State},
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
use serde::Serialize;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CreateCategory, CreateImage, CreateProduct, Image, ImageResponse, PageFilter,
    Product, ProductResponse, UpdateCategory, UpdateImage, UpdateProduct,
};
use crate::repository::{CategoryRepository, ImageRepository, ProductRepository};
use crate::service::CatalogService;

const CATEGORIES_TAG: &str = "categories";
const PRODUCTS_TAG: &str = "products";
const IMAGES_TAG: &str = "images";

/// Catalog repositories bundled behind one service generic
pub trait CatalogRepo: CategoryRepository + ProductRepository + ImageRepository {}
impl<T: CategoryRepository + ProductRepository + ImageRepository> CatalogRepo for T {}

fn require_admin(claims: &JwtClaims) -> CatalogResult<()> {
    if claims.has_any_role(&[ROLE_ADMIN]) {
        Ok(())
    } else {
        Err(CatalogError::Forbidden)
    }
}

/// OpenAPI documentation for the Categories API
#[derive(OpenApi)]
#[openapi(
    paths(create_category, list_categories, get_category, update_category, delete_category),
    components(
        schemas(Category, CreateCategory, UpdateCategory, ListCategoriesResponse),
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
    tags((name = CATEGORIES_TAG, description = "Category management endpoints"))
)]
pub struct CategoriesApiDoc;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(create_product, list_products, get_product, update_product, delete_product),
    components(
        schemas(Product, ProductResponse, CreateProduct, UpdateProduct),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = PRODUCTS_TAG, description = "Product management endpoints"))
)]
pub struct ProductsApiDoc;

/// OpenAPI documentation for the Images API
#[derive(OpenApi)]
#[openapi(
    paths(create_image, upload_image, list_images, get_image, update_image, delete_image),
    components(
        schemas(Image, ImageResponse, CreateImage, UpdateImage, ListImagesResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = IMAGES_TAG, description = "Image upload and management endpoints"))
)]
pub struct ImagesApiDoc;

/// Router for `/categories`
pub fn categories_router<R: CatalogRepo + 'static>(service: Arc<CatalogService<R>>) -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .with_state(service)
}

/// Router for `/products`
pub fn products_router<R: CatalogRepo + 'static>(service: Arc<CatalogService<R>>) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .with_state(service)
}

/// Router for `/images`
pub fn images_router<R: CatalogRepo + 'static>(service: Arc<CatalogService<R>>) -> Router {
    Router::new()
        .route("/", get(list_images).post(create_image))
        .route("/upload", post(upload_image))
        .route(
            "/{id}",
            get(get_image).patch(update_image).delete(delete_image),
        )
        .with_state(service)
}

/// Paginated category listing envelope
#[derive(Debug, Serialize, utoipa::ToSchema)]
struct ListCategoriesResponse {
    data: Vec<Category>,
    total: u64,
    page: u64,
    limit: u64,
}

/// Paginated image listing envelope
#[derive(Debug, Serialize, utoipa::ToSchema)]
struct ListImagesResponse {
    data: Vec<ImageResponse>,
    total: u64,
    page: u64,
    limit: u64,
}

// Categories

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "",
    tag = CATEGORIES_TAG,
    request_body = CreateCategory,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    require_admin(&claims)?;
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List categories
#[utoipa::path(
    get,
    path = "",
    tag = CATEGORIES_TAG,
    params(PageFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated categories", body = ListCategoriesResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(filter): Query<PageFilter>,
) -> CatalogResult<Json<ListCategoriesResponse>> {
    let (data, total) = service.list_categories(filter).await?;
    Ok(Json(ListCategoriesResponse {
        data,
        total,
        page: filter.page,
        limit: filter.limit,
    }))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Category>> {
    Ok(Json(service.get_category(id).await?))
}

/// Update a category (admin only)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategory,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CatalogResult<Json<Category>> {
    require_admin(&claims)?;
    Ok(Json(service.update_category(id, input).await?))
}

/// Delete a category (admin only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> CatalogResult<impl IntoResponse> {
    require_admin(&claims)?;
    service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Products

/// Create a product (admin only); the category is referenced by name
#[utoipa::path(
    post,
    path = "",
    tag = PRODUCTS_TAG,
    request_body = CreateProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    require_admin(&claims)?;
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// List products with their categories
#[utoipa::path(
    get,
    path = "",
    tag = PRODUCTS_TAG,
    params(PageFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of products", body = Vec<ProductResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(filter): Query<PageFilter>,
) -> CatalogResult<Json<Vec<ProductResponse>>> {
    Ok(Json(service.list_products(filter).await?))
}

/// Get a product by ID with its category
#[utoipa::path(
    get,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ProductResponse>> {
    Ok(Json(service.get_product(id).await?))
}

/// Update a product (admin only)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>> {
    require_admin(&claims)?;
    Ok(Json(service.update_product(id, input).await?))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> CatalogResult<impl IntoResponse> {
    require_admin(&claims)?;
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Images

/// Create an image record from a URL (admin only)
#[utoipa::path(
    post,
    path = "",
    tag = IMAGES_TAG,
    request_body = CreateImage,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Image created", body = Image),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_image<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<CreateImage>,
) -> CatalogResult<impl IntoResponse> {
    require_admin(&claims)?;
    let image = service.create_image(input).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// Upload an image file for a product (admin only)
///
/// Multipart form with a `file` part and a `product_id` text part.
#[utoipa::path(
    post,
    path = "/upload",
    tag = IMAGES_TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Image stored", body = Image),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_image<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    mut multipart: Multipart,
) -> CatalogResult<impl IntoResponse> {
    require_admin(&claims)?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut product_id: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CatalogError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(|n| n.to_string())
                    .ok_or_else(|| CatalogError::Validation("File name missing".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| CatalogError::Validation(format!("Failed to read file: {}", e)))?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("product_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| CatalogError::Validation(format!("Invalid product_id: {}", e)))?;
                product_id = Some(
                    Uuid::parse_str(&text)
                        .map_err(|_| CatalogError::Validation("Invalid product_id".to_string()))?,
                );
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| CatalogError::Validation("File and product_id must be provided".to_string()))?;
    let product_id = product_id
        .ok_or_else(|| CatalogError::Validation("File and product_id must be provided".to_string()))?;

    let image = service.upload_image(&filename, &bytes, product_id).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// List images with their products
#[utoipa::path(
    get,
    path = "",
    tag = IMAGES_TAG,
    params(PageFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated images", body = ListImagesResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_images<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(filter): Query<PageFilter>,
) -> CatalogResult<Json<ListImagesResponse>> {
    let (data, total) = service.list_images(filter).await?;
    Ok(Json(ListImagesResponse {
        data,
        total,
        page: filter.page,
        limit: filter.limit,
    }))
}

/// Get an image by ID with its product
#[utoipa::path(
    get,
    path = "/{id}",
    tag = IMAGES_TAG,
    params(("id" = Uuid, Path, description = "Image ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Image found", body = ImageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_image<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ImageResponse>> {
    Ok(Json(service.get_image(id).await?))
}

/// Update an image record (admin only)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = IMAGES_TAG,
    params(("id" = Uuid, Path, description = "Image ID")),
    request_body = UpdateImage,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Image updated", body = Image),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_image<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateImage>,
) -> CatalogResult<Json<Image>> {
    require_admin(&claims)?;
    Ok(Json(service.update_image(id, input).await?))
}

/// Delete an image record (admin only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = IMAGES_TAG,
    params(("id" = Uuid, Path, description = "Image ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_image<R: CatalogRepo>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> CatalogResult<impl IntoResponse> {
    require_admin(&claims)?;
    service.delete_image(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
