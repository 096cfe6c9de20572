use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CustomerError, CustomerResult};
use crate::models::{CreateCustomer, Customer, CustomerFilter, UpdateCustomer};
use crate::repository::CustomerRepository;

/// Service layer for Customer business logic
#[derive(Clone)]
pub struct CustomerService<R: CustomerRepository> {
    repository: Arc<R>,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_customer(&self, input: CreateCustomer) -> CustomerResult<Customer> {
        input
            .validate()
            .map_err(|e| CustomerError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    pub async fn get_customer(&self, id: Uuid) -> CustomerResult<Customer> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }

    pub async fn get_customer_by_user(&self, user_id: Uuid) -> CustomerResult<Option<Customer>> {
        self.repository.get_by_user_id(user_id).await
    }

    pub async fn list_customers(
        &self,
        filter: CustomerFilter,
    ) -> CustomerResult<(Vec<Customer>, u64)> {
        self.repository.list(filter.page, filter.limit).await
    }

    pub async fn update_customer(
        &self,
        id: Uuid,
        input: UpdateCustomer,
    ) -> CustomerResult<Customer> {
        input
            .validate()
            .map_err(|e| CustomerError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    pub async fn delete_customer(&self, id: Uuid) -> CustomerResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CustomerError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryCustomerRepository;

    fn input() -> CreateCustomer {
        CreateCustomer {
            user_id: Uuid::now_v7(),
            address: "Main St 1".to_string(),
            phone: "+1 555 0100".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_validates_phone() {
        let service = CustomerService::new(InMemoryCustomerRepository::new());
        let result = service
            .create_customer(CreateCustomer {
                phone: "nope".to_string(),
                ..input()
            })
            .await;
        assert!(matches!(result, Err(CustomerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_crud_round_trip() {
        let service = CustomerService::new(InMemoryCustomerRepository::new());
        let created = service.create_customer(input()).await.unwrap();

        let fetched = service.get_customer(created.id).await.unwrap();
        assert_eq!(fetched.address, "Main St 1");

        let updated = service
            .update_customer(
                created.id,
                UpdateCustomer {
                    address: Some("Elm St 2".to_string()),
                    phone: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.address, "Elm St 2");

        service.delete_customer(created.id).await.unwrap();
        let missing = service.get_customer(created.id).await;
        assert!(matches!(missing, Err(CustomerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let service = CustomerService::new(InMemoryCustomerRepository::new());
        let result = service.delete_customer(Uuid::now_v7()).await;
        assert!(matches!(result, Err(CustomerError::NotFound(_))));
    }
}
