use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{WarrantyError, WarrantyResult};
use crate::models::{CreateWarranty, Warranty, WarrantyFilter, WarrantyValidity};
use crate::repository::WarrantyRepository;

/// Service layer for Warranty business logic
#[derive(Clone)]
pub struct WarrantyService<R: WarrantyRepository> {
    repository: Arc<R>,
}

impl<R: WarrantyRepository> WarrantyService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a warranty; the end date is derived from the period and
    /// overlapping intervals for the same product are rejected.
    pub async fn create_warranty(&self, input: CreateWarranty) -> WarrantyResult<Warranty> {
        input
            .validate()
            .map_err(|e| WarrantyError::Validation(e.to_string()))?;

        self.repository
            .create_if_no_overlap(Warranty::new(input))
            .await
    }

    pub async fn get_warranty(&self, id: Uuid) -> WarrantyResult<Warranty> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(WarrantyError::NotFound(id))
    }

    pub async fn list_warranties(
        &self,
        filter: WarrantyFilter,
    ) -> WarrantyResult<(Vec<Warranty>, u64)> {
        self.repository.list(filter.page, filter.limit).await
    }

    /// Whether the product's most recent warranty still covers today.
    pub async fn validate_warranty(&self, product_id: Uuid) -> WarrantyResult<WarrantyValidity> {
        let warranty = self
            .repository
            .latest_for_product(product_id)
            .await?
            .ok_or(WarrantyError::NoneForProduct(product_id))?;

        Ok(WarrantyValidity {
            product_id,
            valid: warranty.is_active(Utc::now().date_naive()),
            end_date: warranty.end_date,
        })
    }

    /// Process a warranty claim against the product's most recent warranty.
    pub async fn claim_warranty(&self, product_id: Uuid) -> WarrantyResult<String> {
        let warranty = self
            .repository
            .latest_for_product(product_id)
            .await?
            .ok_or(WarrantyError::NoneForProduct(product_id))?;

        if warranty.is_active(Utc::now().date_naive()) {
            Ok("Warranty claim processed successfully.".to_string())
        } else {
            Ok("Warranty claim failed. Warranty has expired or is invalid.".to_string())
        }
    }

    /// Per-product warranty summary used by receipt generation.
    pub async fn warranties_for_product(&self, product_id: Uuid) -> WarrantyResult<Vec<Warranty>> {
        self.repository.all_for_product(product_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryWarrantyRepository;
    use chrono::{Duration, NaiveDate};

    fn service() -> WarrantyService<InMemoryWarrantyRepository> {
        WarrantyService::new(InMemoryWarrantyRepository::new())
    }

    fn input(product_id: Uuid, start_date: NaiveDate, period: i32) -> CreateWarranty {
        CreateWarranty {
            product_id,
            period,
            start_date,
            details: "Standard coverage".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_period() {
        let service = service();
        let result = service
            .create_warranty(input(
                Uuid::now_v7(),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                0,
            ))
            .await;
        assert!(matches!(result, Err(WarrantyError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_overlap() {
        let service = service();
        let product_id = Uuid::now_v7();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        service.create_warranty(input(product_id, start, 12)).await.unwrap();

        let result = service
            .create_warranty(input(
                product_id,
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                3,
            ))
            .await;
        assert!(matches!(result, Err(WarrantyError::Overlapping)));
    }

    #[tokio::test]
    async fn test_validate_active_warranty() {
        let service = service();
        let product_id = Uuid::now_v7();
        let today = Utc::now().date_naive();

        service
            .create_warranty(input(product_id, today - Duration::days(30), 12))
            .await
            .unwrap();

        let validity = service.validate_warranty(product_id).await.unwrap();
        assert!(validity.valid);
    }

    #[tokio::test]
    async fn test_validate_expired_warranty() {
        let service = service();
        let product_id = Uuid::now_v7();
        let today = Utc::now().date_naive();

        // Started two years ago with a 12 month period
        service
            .create_warranty(input(product_id, today - Duration::days(730), 12))
            .await
            .unwrap();

        let validity = service.validate_warranty(product_id).await.unwrap();
        assert!(!validity.valid);
    }

    #[tokio::test]
    async fn test_validate_without_warranty_is_not_found() {
        let service = service();
        let result = service.validate_warranty(Uuid::now_v7()).await;
        assert!(matches!(result, Err(WarrantyError::NoneForProduct(_))));
    }

    #[tokio::test]
    async fn test_claim_messages() {
        let service = service();
        let product_id = Uuid::now_v7();
        let today = Utc::now().date_naive();

        service
            .create_warranty(input(product_id, today - Duration::days(30), 12))
            .await
            .unwrap();

        let message = service.claim_warranty(product_id).await.unwrap();
        assert_eq!(message, "Warranty claim processed successfully.");

        let expired_product = Uuid::now_v7();
        service
            .create_warranty(input(expired_product, today - Duration::days(730), 12))
            .await
            .unwrap();

        let message = service.claim_warranty(expired_product).await.unwrap();
        assert_eq!(
            message,
            "Warranty claim failed. Warranty has expired or is invalid."
        );
    }
}
