use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    extract_ip_from_headers, extract_user_agent, AuditEvent, AuditOutcome, JwtAuth, ValidatedJson,
};
use domain_notifications::MailService;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{
    ForgotPasswordRequest, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest,
    ResendOtpRequest, ResetPasswordRequest, TokenResponse, UserResponse, VerifyOtpRequest,
};
use crate::repository::UserRepository;
use crate::service::UserService;

const TAG: &str = "auth";

/// State for the auth endpoints
#[derive(Clone)]
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt_auth: JwtAuth,
    pub mail: MailService,
}

/// OpenAPI documentation for the Auth API
#[derive(OpenApi)]
#[openapi(
    paths(register, verify_otp, resend_otp, login, refresh, forgot_password, reset_password, me),
    components(
        schemas(
            RegisterRequest,
            VerifyOtpRequest,
            ResendOtpRequest,
            LoginRequest,
            RefreshTokenRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            TokenResponse,
            MessageResponse,
            UserResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Registration, OTP verification, and token endpoints")
    )
)]
pub struct ApiDoc;

/// Create the auth router. These routes are public except `/me`.
pub fn router<R: UserRepository + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/me", get(me))
        .with_state(state)
}

/// Register a new account and send the verification OTP
#[utoipa::path(
    post,
    path = "/register",
    tag = TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, OTP sent", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    state
        .service
        .ensure_registrable(&input.email, input.role)
        .await?;

    // The user row is only created once the OTP email is on its way
    let otp = UserService::<R>::generate_otp();
    state
        .mail
        .send_otp(&input.email, &input.username, &otp)
        .await
        .map_err(|e| UserError::Email(format!("Failed to send OTP email: {}", e)))?;

    let user = state.service.register_unverified(input, otp).await?;

    AuditEvent::new(
        Some(user.id.to_string()),
        "auth.register",
        Some(format!("user:{}", user.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registration successful, an OTP has been sent to your email".to_string(),
        }),
    ))
}

/// Verify the emailed OTP code
#[utoipa::path(
    post,
    path = "/verify-otp",
    tag = TAG,
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn verify_otp<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<VerifyOtpRequest>,
) -> UserResult<Json<MessageResponse>> {
    state.service.verify_otp(&input.email, &input.otp).await?;

    Ok(Json(MessageResponse {
        message: "Email verified successfully".to_string(),
    }))
}

/// Re-send the OTP once the previous one expired
#[utoipa::path(
    post,
    path = "/resend-otp",
    tag = TAG,
    request_body = ResendOtpRequest,
    responses(
        (status = 200, description = "OTP re-sent", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn resend_otp<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<ResendOtpRequest>,
) -> UserResult<Json<MessageResponse>> {
    let (user, otp) = state.service.resend_otp(&input.email).await?;

    state
        .mail
        .send_otp(&user.email, &user.username, &otp)
        .await
        .map_err(|e| UserError::Email(format!("Failed to send OTP email: {}", e)))?;

    Ok(Json(MessageResponse {
        message: "OTP has been resent".to_string(),
    }))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = TokenResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<TokenResponse>> {
    let user = match state
        .service
        .verify_credentials(&input.email, &input.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            AuditEvent::new(None, "auth.login", None, AuditOutcome::Denied)
                .with_ip(extract_ip_from_headers(&headers))
                .with_user_agent(extract_user_agent(&headers))
                .with_details(serde_json::json!({"email": input.email}))
                .log();
            return Err(e);
        }
    };

    let user_id = user.id.to_string();
    let roles = user.role_claims();

    let access_token = state
        .jwt_auth
        .create_access_token(&user_id, &user.username, &roles)
        .map_err(|e| UserError::Internal(format!("Failed to create token: {}", e)))?;

    let refresh_token = state
        .jwt_auth
        .create_refresh_token(&user_id, &user.username, &roles)
        .map_err(|e| UserError::Internal(format!("Failed to create token: {}", e)))?;

    state
        .service
        .store_refresh_token(user.id, &refresh_token)
        .await?;

    AuditEvent::new(
        Some(user_id),
        "auth.login",
        None,
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok(Json(TokenResponse {
        access_token,
        refresh_token: Some(refresh_token),
    }))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/refresh",
    tag = TAG,
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = TokenResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn refresh<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RefreshTokenRequest>,
) -> UserResult<Json<TokenResponse>> {
    let claims = state
        .jwt_auth
        .verify_token(&input.token)
        .map_err(|_| UserError::InvalidRefreshToken)?;

    let user_id = claims.user_id().ok_or(UserError::InvalidRefreshToken)?;

    let user = state
        .service
        .validate_refresh_token(user_id, &input.token)
        .await?;

    let access_token = state
        .jwt_auth
        .create_access_token(&user.id.to_string(), &user.username, &user.role_claims())
        .map_err(|e| UserError::Internal(format!("Failed to create token: {}", e)))?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token: None,
    }))
}

/// Request a password-reset email
#[utoipa::path(
    post,
    path = "/forgot-password",
    tag = TAG,
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent", body = MessageResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn forgot_password<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<ForgotPasswordRequest>,
) -> UserResult<Json<MessageResponse>> {
    let (user, token) = state.service.forgot_password(&input.email).await?;

    state
        .mail
        .send_password_reset(&user.email, &user.username, &token)
        .await
        .map_err(|e| UserError::Email(format!("Failed to send reset email: {}", e)))?;

    Ok(Json(MessageResponse {
        message: "Password reset email sent".to_string(),
    }))
}

/// Complete a password reset
#[utoipa::path(
    post,
    path = "/reset-password",
    tag = TAG,
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn reset_password<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<ResetPasswordRequest>,
) -> UserResult<Json<MessageResponse>> {
    state
        .service
        .reset_password(&input.token, &input.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password has been reset".to_string(),
    }))
}

/// Current account, resolved from the bearer token
#[utoipa::path(
    get,
    path = "/me",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn me<R: UserRepository>(
    State(state): State<AuthState<R>>,
    headers: HeaderMap,
) -> UserResult<Json<UserResponse>> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .ok_or(UserError::Unauthorized)?;

    let claims = state
        .jwt_auth
        .verify_token(token)
        .map_err(|_| UserError::Unauthorized)?;

    let user_id = claims.user_id().ok_or(UserError::Unauthorized)?;
    let user = state.service.get_user(user_id).await?;

    Ok(Json(user))
}
