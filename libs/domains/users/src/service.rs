use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use database::redis::CacheStore;
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{RegisterRequest, Role, UpdateUser, User, UserFilter, UserResponse};
use crate::repository::UserRepository;

/// OTP codes are valid for this many minutes after issuance.
pub const OTP_TTL_MINUTES: i64 = 5;

/// Password reset tokens are valid for this long.
pub const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Service layer for User business logic.
///
/// Lookups by email go through an optional Redis cache-aside layer; every
/// mutation invalidates the affected entry.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    cache: Option<CacheStore>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            cache: None,
        }
    }

    pub fn with_cache(repository: R, cache: CacheStore) -> Self {
        Self {
            repository: Arc::new(repository),
            cache: Some(cache),
        }
    }

    // Registration / OTP flow

    /// Reject registration when the email is taken or a second admin is
    /// requested.
    pub async fn ensure_registrable(&self, email: &str, role: Role) -> UserResult<()> {
        if self.repository.get_by_email(email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email.to_string()));
        }

        if role == Role::Admin && self.repository.find_admin().await?.is_some() {
            return Err(UserError::AdminAlreadyExists);
        }

        Ok(())
    }

    /// Generate a six-digit one-time code.
    pub fn generate_otp() -> String {
        rand::thread_rng().gen_range(100_000..1_000_000).to_string()
    }

    /// Create the unverified user row with the pending OTP.
    ///
    /// The caller has already delivered the OTP email; a user row only exists
    /// once the code is on its way.
    pub async fn register_unverified(
        &self,
        input: RegisterRequest,
        otp: String,
    ) -> UserResult<User> {
        let password_hash = self.hash_password(&input.password)?;

        let mut user = User::new(
            input.username,
            input.email.to_lowercase(),
            password_hash,
            input.role,
        );
        user.otp = Some(otp);
        user.otp_created_at = Some(Utc::now());

        self.repository.create(user).await
    }

    /// Verify the emailed OTP and mark the account verified.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> UserResult<UserResponse> {
        let mut user = self.require_by_email(email).await?;

        let created_at = user.otp_created_at.ok_or(UserError::InvalidOtp)?;
        if Utc::now() > created_at + Duration::minutes(OTP_TTL_MINUTES) {
            return Err(UserError::OtpExpired);
        }

        if user.otp.as_deref() != Some(otp) {
            return Err(UserError::InvalidOtp);
        }

        user.is_verified = true;
        user.otp = None;
        user.updated_at = Utc::now();

        let updated = self.repository.update(user).await?;
        self.invalidate_cache(&updated.email).await;

        tracing::info!(user_id = %updated.id, "Email verified");
        Ok(updated.into())
    }

    /// Issue a fresh OTP once the previous one has expired.
    ///
    /// Returns the user and the new code for the caller to email.
    pub async fn resend_otp(&self, email: &str) -> UserResult<(User, String)> {
        let mut user = self.require_by_email(email).await?;

        if let Some(created_at) = user.otp_created_at {
            if user.otp.is_some() && Utc::now() < created_at + Duration::minutes(OTP_TTL_MINUTES) {
                return Err(UserError::OtpStillValid);
            }
        }

        let otp = Self::generate_otp();
        user.otp = Some(otp.clone());
        user.otp_created_at = Some(Utc::now());
        user.updated_at = Utc::now();

        let updated = self.repository.update(user).await?;
        self.invalidate_cache(&updated.email).await;

        Ok((updated, otp))
    }

    // Login / tokens

    /// Verify login credentials, requiring a verified account.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> UserResult<User> {
        let user = self
            .find_by_email_cached(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        if !user.is_verified {
            return Err(UserError::NotVerified);
        }

        Ok(user)
    }

    /// Persist the refresh token issued at login.
    pub async fn store_refresh_token(&self, user_id: Uuid, token: &str) -> UserResult<()> {
        let mut user = self.require_by_id(user_id).await?;
        user.refresh_token = Some(token.to_string());
        user.updated_at = Utc::now();

        let updated = self.repository.update(user).await?;
        self.invalidate_cache(&updated.email).await;
        Ok(())
    }

    /// Check a presented refresh token against the stored one.
    pub async fn validate_refresh_token(&self, user_id: Uuid, token: &str) -> UserResult<User> {
        let user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::InvalidRefreshToken)?;

        if user.refresh_token.as_deref() != Some(token) {
            return Err(UserError::InvalidRefreshToken);
        }

        Ok(user)
    }

    // Password reset flow

    /// Store a reset token with a one-hour expiry.
    ///
    /// Returns the user and the token for the caller to email.
    pub async fn forgot_password(&self, email: &str) -> UserResult<(User, String)> {
        let mut user = self.require_by_email(email).await?;

        let token = Self::generate_reset_token();
        user.reset_token = Some(token.clone());
        user.reset_token_expiry = Some(Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS));
        user.updated_at = Utc::now();

        let updated = self.repository.update(user).await?;
        self.invalidate_cache(&updated.email).await;

        Ok((updated, token))
    }

    /// Complete a password reset with a previously emailed token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> UserResult<()> {
        let mut user = self
            .repository
            .get_by_reset_token(token)
            .await?
            .ok_or(UserError::InvalidResetToken)?;

        let expiry = user.reset_token_expiry.ok_or(UserError::InvalidResetToken)?;
        if expiry < Utc::now() {
            return Err(UserError::InvalidResetToken);
        }

        user.password_hash = self.hash_password(new_password)?;
        user.reset_token = None;
        user.reset_token_expiry = None;
        user.updated_at = Utc::now();

        let updated = self.repository.update(user).await?;
        self.invalidate_cache(&updated.email).await;

        tracing::info!(user_id = %updated.id, "Password reset completed");
        Ok(())
    }

    // CRUD

    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        Ok(self.require_by_id(id).await?.into())
    }

    pub async fn list_users(&self, filter: UserFilter) -> UserResult<(Vec<UserResponse>, u64)> {
        let (users, total) = self.repository.list(filter.page, filter.limit).await?;
        Ok((users.into_iter().map(Into::into).collect(), total))
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        let mut user = self.require_by_id(id).await?;
        let old_email = user.email.clone();

        let new_password_hash = match input.password.as_deref() {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };

        if let Some(ref new_email) = input.email {
            if !new_email.eq_ignore_ascii_case(&user.email)
                && self.repository.get_by_email(new_email).await?.is_some()
            {
                return Err(UserError::DuplicateEmail(new_email.clone()));
            }
        }

        user.apply_update(input, new_password_hash);

        let updated = self.repository.update(user).await?;
        self.invalidate_cache(&old_email).await;
        self.invalidate_cache(&updated.email).await;
        Ok(updated.into())
    }

    /// Profile self-service update; the role field is ignored here.
    pub async fn update_profile(&self, id: Uuid, mut input: UpdateUser) -> UserResult<UserResponse> {
        input.role = None;
        self.update_user(id, input).await
    }

    pub async fn update_password(
        &self,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> UserResult<()> {
        let mut user = self.require_by_id(id).await?;

        if !self.verify_password(current_password, &user.password_hash)? {
            return Err(UserError::WrongCurrentPassword);
        }

        user.password_hash = self.hash_password(new_password)?;
        user.updated_at = Utc::now();

        let updated = self.repository.update(user).await?;
        self.invalidate_cache(&updated.email).await;
        Ok(())
    }

    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        let user = self.require_by_id(id).await?;

        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }

        self.invalidate_cache(&user.email).await;
        Ok(())
    }

    // Lookup helpers

    async fn require_by_id(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    async fn require_by_email(&self, email: &str) -> UserResult<User> {
        self.repository
            .get_by_email(email)
            .await?
            .ok_or_else(|| UserError::EmailNotFound(email.to_string()))
    }

    /// Read-through cache on the hot login lookup.
    async fn find_by_email_cached(&self, email: &str) -> UserResult<Option<User>> {
        let key = CacheStore::entity_key("user:email", email.to_lowercase());

        if let Some(cache) = &self.cache {
            if let Some(user) = cache.get_json::<User>(&key).await {
                return Ok(Some(user));
            }
        }

        let user = self.repository.get_by_email(email).await?;

        if let (Some(cache), Some(user)) = (&self.cache, &user) {
            cache.set_json(&key, user).await;
        }

        Ok(user)
    }

    async fn invalidate_cache(&self, email: &str) {
        if let Some(cache) = &self.cache {
            cache
                .del(&CacheStore::entity_key("user:email", email.to_lowercase()))
                .await;
        }
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn generate_reset_token() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};

    fn register_input(email: &str, role: Role) -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: email.to_string(),
            password: "Password1!".to_string(),
            role,
        }
    }

    async fn registered(
        service: &UserService<InMemoryUserRepository>,
        email: &str,
        role: Role,
    ) -> (User, String) {
        service
            .ensure_registrable(email, role)
            .await
            .expect("registrable");
        let otp = UserService::<InMemoryUserRepository>::generate_otp();
        let user = service
            .register_unverified(register_input(email, role), otp.clone())
            .await
            .expect("register");
        (user, otp)
    }

    #[test]
    fn test_generate_otp_is_six_digits() {
        for _ in 0..32 {
            let otp = UserService::<InMemoryUserRepository>::generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_reset_token_is_hex() {
        let token = UserService::<InMemoryUserRepository>::generate_reset_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_register_and_verify_otp() {
        let service = UserService::new(InMemoryUserRepository::new());
        let (user, otp) = registered(&service, "alice@example.com", Role::Customer).await;
        assert!(!user.is_verified);

        let verified = service.verify_otp("alice@example.com", &otp).await.unwrap();
        assert!(verified.is_verified);
    }

    #[tokio::test]
    async fn test_verify_otp_rejects_wrong_code() {
        let service = UserService::new(InMemoryUserRepository::new());
        let (_, otp) = registered(&service, "alice@example.com", Role::Customer).await;

        let wrong = if otp == "111111" { "222222" } else { "111111" };
        let result = service.verify_otp("alice@example.com", wrong).await;
        assert!(matches!(result, Err(UserError::InvalidOtp)));
    }

    #[tokio::test]
    async fn test_verify_otp_rejects_expired_code() {
        let repo = InMemoryUserRepository::new();
        let service = UserService::new(repo.clone());
        let (mut user, otp) = registered(&service, "alice@example.com", Role::Customer).await;

        // Age the OTP past the window
        user.otp_created_at = Some(Utc::now() - Duration::minutes(OTP_TTL_MINUTES + 1));
        repo.update(user).await.unwrap();

        let result = service.verify_otp("alice@example.com", &otp).await;
        assert!(matches!(result, Err(UserError::OtpExpired)));
    }

    #[tokio::test]
    async fn test_resend_otp_rejected_while_valid() {
        let service = UserService::new(InMemoryUserRepository::new());
        registered(&service, "alice@example.com", Role::Customer).await;

        let result = service.resend_otp("alice@example.com").await;
        assert!(matches!(result, Err(UserError::OtpStillValid)));
    }

    #[tokio::test]
    async fn test_resend_otp_after_expiry() {
        let repo = InMemoryUserRepository::new();
        let service = UserService::new(repo.clone());
        let (mut user, _) = registered(&service, "alice@example.com", Role::Customer).await;

        user.otp_created_at = Some(Utc::now() - Duration::minutes(OTP_TTL_MINUTES + 1));
        repo.update(user).await.unwrap();

        let (updated, otp) = service.resend_otp("alice@example.com").await.unwrap();
        assert_eq!(updated.otp.as_deref(), Some(otp.as_str()));
    }

    #[tokio::test]
    async fn test_second_admin_rejected() {
        let service = UserService::new(InMemoryUserRepository::new());
        registered(&service, "admin@example.com", Role::Admin).await;

        let result = service
            .ensure_registrable("admin2@example.com", Role::Admin)
            .await;
        assert!(matches!(result, Err(UserError::AdminAlreadyExists)));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_at_registration() {
        let service = UserService::new(InMemoryUserRepository::new());
        registered(&service, "alice@example.com", Role::Customer).await;

        let result = service
            .ensure_registrable("alice@example.com", Role::Customer)
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_login_requires_verification() {
        let service = UserService::new(InMemoryUserRepository::new());
        registered(&service, "alice@example.com", Role::Customer).await;

        let result = service
            .verify_credentials("alice@example.com", "Password1!")
            .await;
        assert!(matches!(result, Err(UserError::NotVerified)));
    }

    #[tokio::test]
    async fn test_login_with_verified_account() {
        let service = UserService::new(InMemoryUserRepository::new());
        let (_, otp) = registered(&service, "alice@example.com", Role::Customer).await;
        service.verify_otp("alice@example.com", &otp).await.unwrap();

        let user = service
            .verify_credentials("alice@example.com", "Password1!")
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");

        let bad = service
            .verify_credentials("alice@example.com", "wrong-password")
            .await;
        assert!(matches!(bad, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_token_round_trip() {
        let service = UserService::new(InMemoryUserRepository::new());
        let (user, _) = registered(&service, "alice@example.com", Role::Customer).await;

        service
            .store_refresh_token(user.id, "refresh-token")
            .await
            .unwrap();

        assert!(service
            .validate_refresh_token(user.id, "refresh-token")
            .await
            .is_ok());

        let result = service.validate_refresh_token(user.id, "stale-token").await;
        assert!(matches!(result, Err(UserError::InvalidRefreshToken)));
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let service = UserService::new(InMemoryUserRepository::new());
        let (user, otp) = registered(&service, "alice@example.com", Role::Customer).await;
        service.verify_otp("alice@example.com", &otp).await.unwrap();

        let (_, token) = service.forgot_password("alice@example.com").await.unwrap();
        service.reset_password(&token, "NewPassword1!").await.unwrap();

        // Old password no longer works, new one does
        assert!(service
            .verify_credentials("alice@example.com", "Password1!")
            .await
            .is_err());
        assert!(service
            .verify_credentials("alice@example.com", "NewPassword1!")
            .await
            .is_ok());

        // Token is single-use
        let reuse = service.reset_password(&token, "Another1!").await;
        assert!(matches!(reuse, Err(UserError::InvalidResetToken)));

        // The user exists and id lookup works after reset
        assert!(service.get_user(user.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_rejects_expired_token() {
        let repo = InMemoryUserRepository::new();
        let service = UserService::new(repo.clone());
        registered(&service, "alice@example.com", Role::Customer).await;

        let (mut user, token) = service.forgot_password("alice@example.com").await.unwrap();
        user.reset_token_expiry = Some(Utc::now() - Duration::minutes(1));
        repo.update(user).await.unwrap();

        let result = service.reset_password(&token, "NewPassword1!").await;
        assert!(matches!(result, Err(UserError::InvalidResetToken)));
    }

    #[tokio::test]
    async fn test_update_password_requires_current() {
        let service = UserService::new(InMemoryUserRepository::new());
        let (user, _) = registered(&service, "alice@example.com", Role::Customer).await;

        let result = service
            .update_password(user.id, "wrong", "NewPassword1!")
            .await;
        assert!(matches!(result, Err(UserError::WrongCurrentPassword)));

        service
            .update_password(user.id, "Password1!", "NewPassword1!")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_user_rejects_taken_email() {
        let service = UserService::new(InMemoryUserRepository::new());
        let (alice, _) = registered(&service, "alice@example.com", Role::Customer).await;
        registered(&service, "bob@example.com", Role::Customer).await;

        let result = service
            .update_user(
                alice.id,
                UpdateUser {
                    email: Some("bob@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_update_profile_ignores_role() {
        let service = UserService::new(InMemoryUserRepository::new());
        let (user, _) = registered(&service, "alice@example.com", Role::Customer).await;

        let updated = service
            .update_profile(
                user.id,
                UpdateUser {
                    role: Some(Role::Admin),
                    username: Some("alice-renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.role, Role::Customer);
        assert_eq!(updated.username, "alice-renamed");
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let service = UserService::new(InMemoryUserRepository::new());
        let result = service.delete_user(Uuid::now_v7()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ensure_registrable_with_mocked_repository() {
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_email().returning(|_| Ok(None));
        mock.expect_find_admin().returning(|| {
            Ok(Some(User::new(
                "root".to_string(),
                "root@example.com".to_string(),
                "hash".to_string(),
                Role::Admin,
            )))
        });

        let service = UserService::new(mock);
        let result = service
            .ensure_registrable("new-admin@example.com", Role::Admin)
            .await;
        assert!(matches!(result, Err(UserError::AdminAlreadyExists)));
    }
}
