use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT token time-to-live constants
pub const ACCESS_TOKEN_TTL: i64 = 900; // 15 minutes
pub const REFRESH_TOKEN_TTL: i64 = 604800; // 7 days

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,        // Subject (user ID)
    pub username: String,   // User display name
    pub roles: Vec<String>, // User roles
    pub exp: i64,           // Expiration time
    pub iat: i64,           // Issued at
    pub jti: String,        // JWT ID
}

impl JwtClaims {
    /// Whether the subject carries any of the given roles.
    ///
    /// An empty allowlist means "any authenticated subject".
    pub fn has_any_role(&self, allowed: &[&str]) -> bool {
        allowed.is_empty() || self.roles.iter().any(|r| allowed.contains(&r.as_str()))
    }

    /// Parse the subject claim as a user id.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Stateless HS256 JWT issuance and verification.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!("JWT auth initialized");
        Self {
            secret: config.secret.clone(),
        }
    }

    /// Create an access token (15 min)
    pub fn create_access_token(
        &self,
        user_id: &str,
        username: &str,
        roles: &[String],
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.create_token(user_id, username, roles, ACCESS_TOKEN_TTL)
    }

    /// Create a refresh token (7 days)
    pub fn create_refresh_token(
        &self,
        user_id: &str,
        username: &str,
        roles: &[String],
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.create_token(user_id, username, roles, REFRESH_TOKEN_TTL)
    }

    /// Create a JWT token with the given TTL
    fn create_token(
        &self,
        user_id: &str,
        username: &str,
        roles: &[String],
        ttl_seconds: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(ttl_seconds)).timestamp();
        let iat = now.timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = JwtClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            roles: roles.to_vec(),
            exp,
            iat,
            jti,
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Verify a JWT token's signature and expiry, returning its claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("unit-test-secret-that-is-32-chars!!"))
    }

    #[test]
    fn test_create_and_verify_access_token() {
        let auth = auth();
        let user_id = Uuid::now_v7();

        let token = auth
            .create_access_token(&user_id.to_string(), "alice", &["customer".to_string()])
            .unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.roles, vec!["customer".to_string()]);
        assert_eq!(claims.user_id(), Some(user_id));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let auth_a = auth();
        let auth_b = JwtAuth::new(&JwtConfig::new("another-secret-that-is-32-chars!!!!"));

        let token = auth_a
            .create_access_token("user", "alice", &["customer".to_string()])
            .unwrap();

        assert!(auth_b.verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(auth().verify_token("not.a.jwt").is_err());
    }

    #[test]
    fn test_has_any_role() {
        let claims = JwtClaims {
            sub: "id".to_string(),
            username: "alice".to_string(),
            roles: vec!["customer".to_string()],
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
        };

        assert!(claims.has_any_role(&[]));
        assert!(claims.has_any_role(&["customer", "admin"]));
        assert!(!claims.has_any_role(&["admin"]));
    }

    #[test]
    fn test_refresh_token_lives_longer() {
        let auth = auth();
        let access = auth
            .create_access_token("u", "alice", &[])
            .and_then(|t| auth.verify_token(&t))
            .unwrap();
        let refresh = auth
            .create_refresh_token("u", "alice", &[])
            .and_then(|t| auth.verify_token(&t))
            .unwrap();

        assert!(refresh.exp > access.exp);
    }
}
