use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{WarrantyError, WarrantyResult};
use crate::models::Warranty;

/// Repository trait for Warranty persistence
#[async_trait]
pub trait WarrantyRepository: Send + Sync {
    /// Insert the warranty unless an overlapping interval exists for the same
    /// product. The check and the insert are atomic in the PostgreSQL
    /// implementation.
    async fn create_if_no_overlap(&self, warranty: Warranty) -> WarrantyResult<Warranty>;

    async fn get_by_id(&self, id: Uuid) -> WarrantyResult<Option<Warranty>>;

    /// The product's warranty with the latest end date
    async fn latest_for_product(&self, product_id: Uuid) -> WarrantyResult<Option<Warranty>>;

    /// Every warranty for the product, for receipt summaries
    async fn all_for_product(&self, product_id: Uuid) -> WarrantyResult<Vec<Warranty>>;

    async fn list(&self, page: u64, limit: u64) -> WarrantyResult<(Vec<Warranty>, u64)>;
}

/// In-memory implementation of WarrantyRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryWarrantyRepository {
    warranties: Arc<RwLock<HashMap<Uuid, Warranty>>>,
}

impl InMemoryWarrantyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WarrantyRepository for InMemoryWarrantyRepository {
    async fn create_if_no_overlap(&self, warranty: Warranty) -> WarrantyResult<Warranty> {
        let mut warranties = self.warranties.write().await;

        let overlapping = warranties.values().any(|w| {
            w.product_id == warranty.product_id
                && w.overlaps(warranty.start_date, warranty.end_date)
        });

        if overlapping {
            return Err(WarrantyError::Overlapping);
        }

        warranties.insert(warranty.id, warranty.clone());
        tracing::info!(warranty_id = %warranty.id, product_id = %warranty.product_id, "Created warranty");
        Ok(warranty)
    }

    async fn get_by_id(&self, id: Uuid) -> WarrantyResult<Option<Warranty>> {
        Ok(self.warranties.read().await.get(&id).cloned())
    }

    async fn latest_for_product(&self, product_id: Uuid) -> WarrantyResult<Option<Warranty>> {
        let warranties = self.warranties.read().await;
        Ok(warranties
            .values()
            .filter(|w| w.product_id == product_id)
            .max_by_key(|w| w.end_date)
            .cloned())
    }

    async fn all_for_product(&self, product_id: Uuid) -> WarrantyResult<Vec<Warranty>> {
        let warranties = self.warranties.read().await;
        let mut result: Vec<Warranty> = warranties
            .values()
            .filter(|w| w.product_id == product_id)
            .cloned()
            .collect();
        result.sort_by_key(|w| w.start_date);
        Ok(result)
    }

    async fn list(&self, page: u64, limit: u64) -> WarrantyResult<(Vec<Warranty>, u64)> {
        let warranties = self.warranties.read().await;
        let total = warranties.len() as u64;

        let mut result: Vec<Warranty> = warranties.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let skip = page.saturating_sub(1).saturating_mul(limit) as usize;
        Ok((
            result.into_iter().skip(skip).take(limit as usize).collect(),
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateWarranty;
    use chrono::NaiveDate;

    fn warranty(product_id: Uuid, start: (i32, u32, u32), period: i32) -> Warranty {
        Warranty::new(CreateWarranty {
            product_id,
            period,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            details: String::new(),
        })
    }

    #[tokio::test]
    async fn test_overlapping_warranty_rejected() {
        let repo = InMemoryWarrantyRepository::new();
        let product_id = Uuid::now_v7();

        repo.create_if_no_overlap(warranty(product_id, (2025, 1, 1), 12))
            .await
            .unwrap();

        // Starts inside the existing interval
        let result = repo
            .create_if_no_overlap(warranty(product_id, (2025, 6, 1), 6))
            .await;
        assert!(matches!(result, Err(WarrantyError::Overlapping)));

        // A different product is unaffected
        repo.create_if_no_overlap(warranty(Uuid::now_v7(), (2025, 6, 1), 6))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_adjacent_interval_after_end_is_allowed() {
        let repo = InMemoryWarrantyRepository::new();
        let product_id = Uuid::now_v7();

        repo.create_if_no_overlap(warranty(product_id, (2025, 1, 1), 6))
            .await
            .unwrap();

        // Starts the day after the first interval ends (2025-07-01)
        let result = repo
            .create_if_no_overlap(warranty(product_id, (2025, 7, 2), 6))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_latest_for_product() {
        let repo = InMemoryWarrantyRepository::new();
        let product_id = Uuid::now_v7();

        repo.create_if_no_overlap(warranty(product_id, (2024, 1, 1), 6))
            .await
            .unwrap();
        let later = repo
            .create_if_no_overlap(warranty(product_id, (2025, 1, 1), 6))
            .await
            .unwrap();

        let latest = repo.latest_for_product(product_id).await.unwrap().unwrap();
        assert_eq!(latest.id, later.id);
    }
}
