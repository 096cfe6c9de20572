use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

fn validate_price(price: &Decimal) -> Result<(), validator::ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(validator::ValidationError::new("price_not_positive"));
    }
    Ok(())
}

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    /// Unique category name, referenced by products at creation time
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            created_at: Utc::now(),
        }
    }

    pub fn apply_update(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Unit price
    #[schema(value_type = String)]
    pub price: Decimal,
    /// Units in stock; order items may not exceed it
    pub stock: i32,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn apply_update(&mut self, update: UpdateProduct, category_id: Option<Uuid>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(category_id) = category_id {
            self.category_id = category_id;
        }
        self.updated_at = Utc::now();
    }
}

/// Product with its category relation, as returned by the read endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
}

/// Image entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Image {
    pub id: Uuid,
    /// Public URL, e.g. `/uploads/<filename>`
    pub url: String,
    pub product_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Image {
    pub fn new(url: String, product_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::now_v7(),
            url,
            product_id,
            created_at: Utc::now(),
        }
    }
}

/// Image with its product relation, as returned by the read endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageResponse {
    #[serde(flatten)]
    pub image: Image,
    pub product: Option<Product>,
}

/// DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// DTO for updating a category
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// DTO for creating a product; the category is referenced by name
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String)]
    pub price: Decimal,
    #[validate(range(min = 0))]
    pub stock: i32,
    /// Name of an existing category
    #[validate(length(min = 1))]
    pub category: String,
    /// Optional existing image to attach to the product
    pub image_id: Option<Uuid>,
}

/// DTO for updating a product
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    /// Name of an existing category
    pub category: Option<String>,
}

/// DTO for creating an image from a URL
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateImage {
    #[validate(length(min = 1, max = 500))]
    pub url: String,
}

/// DTO for updating an image record
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateImage {
    #[validate(length(min = 1, max = 500))]
    pub url: Option<String>,
    pub product_id: Option<Uuid>,
}

/// Pagination for catalog listings
#[derive(Debug, Clone, Copy, Deserialize, ToSchema, IntoParams)]
pub struct PageFilter {
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

impl Default for PageFilter {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_must_be_positive() {
        assert!(validate_price(&Decimal::new(999, 2)).is_ok());
        assert!(validate_price(&Decimal::ZERO).is_err());
        assert!(validate_price(&Decimal::new(-100, 2)).is_err());
    }

    #[test]
    fn test_product_apply_update() {
        let mut product = Product {
            id: Uuid::now_v7(),
            name: "Lamp".to_string(),
            description: String::new(),
            price: Decimal::new(1999, 2),
            stock: 10,
            category_id: Uuid::now_v7(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let new_category = Uuid::now_v7();

        product.apply_update(
            UpdateProduct {
                price: Some(Decimal::new(2499, 2)),
                stock: Some(7),
                ..Default::default()
            },
            Some(new_category),
        );

        assert_eq!(product.price, Decimal::new(2499, 2));
        assert_eq!(product.stock, 7);
        assert_eq!(product.category_id, new_category);
        assert_eq!(product.name, "Lamp");
    }
}
