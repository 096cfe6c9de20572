use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
    UuidPath, ValidatedJson,
};
use domain_orders::repository::OrderRepository;
use domain_warranties::repository::WarrantyRepository;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{BillingError, BillingResult};
use crate::models::{
    CreatePayment, CreateReceipt, Payment, PaymentResponse, Receipt, ReceiptResponse,
};
use crate::repository::BillingRepository;
use crate::service::BillingService;

const PAYMENTS_TAG: &str = "payments";
const RECEIPTS_TAG: &str = "receipts";

/// OpenAPI documentation for the Payments API
#[derive(OpenApi)]
#[openapi(
    paths(create_payment, list_payments, get_payment),
    components(
        schemas(Payment, PaymentResponse, CreatePayment),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = PAYMENTS_TAG, description = "Payment endpoints"))
)]
pub struct PaymentsApiDoc;

/// OpenAPI documentation for the Receipts API
#[derive(OpenApi)]
#[openapi(
    paths(generate_receipt, list_receipts, get_receipt, download_receipt),
    components(
        schemas(Receipt, ReceiptResponse, CreateReceipt),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = RECEIPTS_TAG, description = "Receipt generation and download endpoints"))
)]
pub struct ReceiptsApiDoc;

/// Router for `/payments`
pub fn payments_router<B, O, W>(service: Arc<BillingService<B, O, W>>) -> Router
where
    B: BillingRepository + 'static,
    O: OrderRepository + 'static,
    W: WarrantyRepository + 'static,
{
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route("/{id}", get(get_payment))
        .with_state(service)
}

/// Router for `/receipts`
pub fn receipts_router<B, O, W>(service: Arc<BillingService<B, O, W>>) -> Router
where
    B: BillingRepository + 'static,
    O: OrderRepository + 'static,
    W: WarrantyRepository + 'static,
{
    Router::new()
        .route("/", get(list_receipts).post(generate_receipt))
        .route("/{id}", get(get_receipt))
        .route("/{id}/download", get(download_receipt))
        .with_state(service)
}

// Payments

/// Create a payment for a pending order
#[utoipa::path(
    post,
    path = "",
    tag = PAYMENTS_TAG,
    request_body = CreatePayment,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Payment created", body = Payment),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_payment<B, O, W>(
    State(service): State<Arc<BillingService<B, O, W>>>,
    ValidatedJson(input): ValidatedJson<CreatePayment>,
) -> BillingResult<impl IntoResponse>
where
    B: BillingRepository,
    O: OrderRepository,
    W: WarrantyRepository,
{
    let payment = service.create_payment(input).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// List payments
#[utoipa::path(
    get,
    path = "",
    tag = PAYMENTS_TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of payments", body = Vec<Payment>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_payments<B, O, W>(
    State(service): State<Arc<BillingService<B, O, W>>>,
) -> BillingResult<Json<Vec<Payment>>>
where
    B: BillingRepository,
    O: OrderRepository,
    W: WarrantyRepository,
{
    Ok(Json(service.list_payments().await?))
}

/// Get a payment by ID with its order
#[utoipa::path(
    get,
    path = "/{id}",
    tag = PAYMENTS_TAG,
    params(("id" = Uuid, Path, description = "Payment ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment found", body = PaymentResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_payment<B, O, W>(
    State(service): State<Arc<BillingService<B, O, W>>>,
    UuidPath(id): UuidPath,
) -> BillingResult<Json<PaymentResponse>>
where
    B: BillingRepository,
    O: OrderRepository,
    W: WarrantyRepository,
{
    Ok(Json(service.get_payment(id).await?))
}

// Receipts

/// Generate a receipt and its PDF document
#[utoipa::path(
    post,
    path = "",
    tag = RECEIPTS_TAG,
    request_body = CreateReceipt,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Receipt generated", body = Receipt),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn generate_receipt<B, O, W>(
    State(service): State<Arc<BillingService<B, O, W>>>,
    ValidatedJson(input): ValidatedJson<CreateReceipt>,
) -> BillingResult<impl IntoResponse>
where
    B: BillingRepository,
    O: OrderRepository,
    W: WarrantyRepository,
{
    let receipt = service.generate_receipt(input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// List receipts with relations
#[utoipa::path(
    get,
    path = "",
    tag = RECEIPTS_TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of receipts", body = Vec<ReceiptResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_receipts<B, O, W>(
    State(service): State<Arc<BillingService<B, O, W>>>,
) -> BillingResult<Json<Vec<ReceiptResponse>>>
where
    B: BillingRepository,
    O: OrderRepository,
    W: WarrantyRepository,
{
    Ok(Json(service.list_receipts().await?))
}

/// Get a receipt by ID with relations
#[utoipa::path(
    get,
    path = "/{id}",
    tag = RECEIPTS_TAG,
    params(("id" = Uuid, Path, description = "Receipt ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Receipt found", body = ReceiptResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_receipt<B, O, W>(
    State(service): State<Arc<BillingService<B, O, W>>>,
    UuidPath(id): UuidPath,
) -> BillingResult<Json<ReceiptResponse>>
where
    B: BillingRepository,
    O: OrderRepository,
    W: WarrantyRepository,
{
    Ok(Json(service.get_receipt(id).await?))
}

/// Download a receipt's PDF document
#[utoipa::path(
    get,
    path = "/{id}/download",
    tag = RECEIPTS_TAG,
    params(("id" = Uuid, Path, description = "Receipt ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn download_receipt<B, O, W>(
    State(service): State<Arc<BillingService<B, O, W>>>,
    UuidPath(id): UuidPath,
) -> BillingResult<impl IntoResponse>
where
    B: BillingRepository,
    O: OrderRepository,
    W: WarrantyRepository,
{
    let path = service.receipt_pdf_path(id).await?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| BillingError::Internal(format!("Failed to read receipt file: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"receipt-{}.pdf\"", id),
            ),
        ],
        bytes,
    ))
}
