use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CustomerError, CustomerResult};
use crate::models::{CreateCustomer, Customer, UpdateCustomer};

/// Repository trait for Customer persistence
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, input: CreateCustomer) -> CustomerResult<Customer>;

    async fn get_by_id(&self, id: Uuid) -> CustomerResult<Option<Customer>>;

    async fn get_by_user_id(&self, user_id: Uuid) -> CustomerResult<Option<Customer>>;

    async fn list(&self, page: u64, limit: u64) -> CustomerResult<(Vec<Customer>, u64)>;

    async fn update(&self, id: Uuid, input: UpdateCustomer) -> CustomerResult<Customer>;

    async fn delete(&self, id: Uuid) -> CustomerResult<bool>;
}

/// In-memory implementation of CustomerRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCustomerRepository {
    customers: Arc<RwLock<HashMap<Uuid, Customer>>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self {
            customers: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, input: CreateCustomer) -> CustomerResult<Customer> {
        let mut customers = self.customers.write().await;

        if customers.values().any(|c| c.user_id == input.user_id) {
            return Err(CustomerError::DuplicateUser(input.user_id));
        }

        let customer = Customer::new(input);
        customers.insert(customer.id, customer.clone());

        tracing::info!(customer_id = %customer.id, "Created customer");
        Ok(customer)
    }

    async fn get_by_id(&self, id: Uuid) -> CustomerResult<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id).cloned())
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> CustomerResult<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.values().find(|c| c.user_id == user_id).cloned())
    }

    async fn list(&self, page: u64, limit: u64) -> CustomerResult<(Vec<Customer>, u64)> {
        let customers = self.customers.read().await;
        let total = customers.len() as u64;

        let mut result: Vec<Customer> = customers.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let skip = page.saturating_sub(1).saturating_mul(limit) as usize;
        let result = result.into_iter().skip(skip).take(limit as usize).collect();

        Ok((result, total))
    }

    async fn update(&self, id: Uuid, input: UpdateCustomer) -> CustomerResult<Customer> {
        let mut customers = self.customers.write().await;

        let customer = customers.get_mut(&id).ok_or(CustomerError::NotFound(id))?;
        customer.apply_update(input);

        Ok(customer.clone())
    }

    async fn delete(&self, id: Uuid) -> CustomerResult<bool> {
        let mut customers = self.customers.write().await;
        Ok(customers.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(user_id: Uuid) -> CreateCustomer {
        CreateCustomer {
            user_id,
            address: "Main St 1".to_string(),
            phone: "+1 555 0100".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryCustomerRepository::new();
        let user_id = Uuid::now_v7();
        let created = repo.create(input(user_id)).await.unwrap();

        assert!(repo.get_by_id(created.id).await.unwrap().is_some());
        assert!(repo.get_by_user_id(user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_one_customer_per_user() {
        let repo = InMemoryCustomerRepository::new();
        let user_id = Uuid::now_v7();
        repo.create(input(user_id)).await.unwrap();

        let result = repo.create(input(user_id)).await;
        assert!(matches!(result, Err(CustomerError::DuplicateUser(_))));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryCustomerRepository::new();
        let result = repo
            .update(Uuid::now_v7(), UpdateCustomer::default())
            .await;
        assert!(matches!(result, Err(CustomerError::NotFound(_))));
    }
}
