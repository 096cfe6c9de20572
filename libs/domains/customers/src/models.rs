use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ()\-]{7,20}$").unwrap());

fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    if !PHONE_PATTERN.is_match(phone) {
        return Err(validator::ValidationError::new("invalid_phone"));
    }
    Ok(())
}

/// Customer entity - billing identity attached to a user account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    /// Owning user account (unique, one customer per user)
    pub user_id: Uuid,
    pub address: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(input: CreateCustomer) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            address: input.address,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateCustomer) {
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        self.updated_at = Utc::now();
    }
}

/// DTO for creating a customer profile
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCustomer {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

/// DTO for updating a customer profile
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomer {
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

/// Pagination for customer listings
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct CustomerFilter {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

impl Default for CustomerFilter {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone("+49 30 1234567").is_ok());
        assert!(validate_phone("(030) 123-4567").is_ok());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("123").is_err());
    }

    #[test]
    fn test_apply_update() {
        let mut customer = Customer::new(CreateCustomer {
            user_id: Uuid::now_v7(),
            address: "Main St 1".to_string(),
            phone: "+1 555 0100".to_string(),
        });

        customer.apply_update(UpdateCustomer {
            address: Some("Elm St 2".to_string()),
            phone: None,
        });

        assert_eq!(customer.address, "Elm St 2");
        assert_eq!(customer.phone, "+1 555 0100");
    }
}
