use super::jwt::{JwtAuth, JwtClaims};
use super::ROLE_ADMIN;
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

/// Extract the bearer token from the Authorization header.
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
}

/// JWT authentication middleware.
///
/// Verifies the bearer token's signature and expiry and inserts [`JwtClaims`]
/// into the request extensions. Requests without a valid token are rejected
/// with 401 - there is no anonymous fallthrough on guarded routes.
///
/// # Example
///
/// ```ignore
/// let protected = Router::new()
///     .route("/orders", get(list_orders))
///     .layer(axum::middleware::from_fn_with_state(jwt_auth.clone(), jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token_from_request(&headers).ok_or_else(|| {
        tracing::debug!("No bearer token in Authorization header");
        AppError::Unauthorized("Authorization header not found".to_string())
    })?;

    let claims = auth.verify_token(&token).map_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
        AppError::Unauthorized("Invalid token".to_string())
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Role allowlist guard, layered after [`jwt_auth_middleware`].
///
/// Denies with 401 when no claims were attached (the route was reached
/// without authentication) and with 403 when none of the subject's roles are
/// in the allowlist. An empty allowlist admits any authenticated subject but
/// never an anonymous one.
///
/// # Example
///
/// ```ignore
/// Router::new()
///     .route("/users", get(list_users))
///     .layer(axum::middleware::from_fn(require_roles(&[ROLE_ADMIN])))
///     .layer(axum::middleware::from_fn_with_state(jwt_auth, jwt_auth_middleware));
/// ```
pub fn require_roles(
    allowed: &'static [&'static str],
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let Some(claims) = request.extensions().get::<JwtClaims>() else {
                tracing::warn!("Role guard reached without authenticated claims");
                return AppError::Unauthorized("Authentication required".to_string())
                    .into_response();
            };

            if !claims.has_any_role(allowed) {
                tracing::debug!(
                    subject = %claims.sub,
                    roles = ?claims.roles,
                    required = ?allowed,
                    "Subject lacks required role"
                );
                return AppError::Forbidden("User does not have the required roles".to_string())
                    .into_response();
            }

            next.run(request).await
        })
    }
}

/// Ownership check for `/{id}`-style routes.
///
/// The authenticated subject must match the path id; admins bypass the check.
pub fn ensure_self_or_admin(claims: &JwtClaims, resource_user_id: Uuid) -> Result<(), AppError> {
    if claims.roles.iter().any(|r| r == ROLE_ADMIN) {
        return Ok(());
    }

    match claims.user_id() {
        Some(id) if id == resource_user_id => Ok(()),
        _ => Err(AppError::Forbidden(
            "You are not allowed to edit this data".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, roles: &[&str]) -> JwtClaims {
        JwtClaims {
            sub: sub.to_string(),
            username: "tester".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        }
    }

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(
            extract_token_from_request(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_missing() {
        assert_eq!(extract_token_from_request(&HeaderMap::new()), None);
    }

    #[test]
    fn test_extract_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(extract_token_from_request(&headers), None);
    }

    #[test]
    fn test_ensure_self_passes_for_owner() {
        let id = Uuid::now_v7();
        let claims = claims(&id.to_string(), &["customer"]);
        assert!(ensure_self_or_admin(&claims, id).is_ok());
    }

    #[test]
    fn test_ensure_self_rejects_other_user() {
        let claims = claims(&Uuid::now_v7().to_string(), &["customer"]);
        assert!(ensure_self_or_admin(&claims, Uuid::now_v7()).is_err());
    }

    #[test]
    fn test_ensure_self_admin_bypasses() {
        let claims = claims(&Uuid::now_v7().to_string(), &["admin"]);
        assert!(ensure_self_or_admin(&claims, Uuid::now_v7()).is_ok());
    }

    #[test]
    fn test_ensure_self_rejects_non_uuid_subject() {
        let claims = claims("not-a-uuid", &["customer"]);
        assert!(ensure_self_or_admin(&claims, Uuid::now_v7()).is_err());
    }
}
