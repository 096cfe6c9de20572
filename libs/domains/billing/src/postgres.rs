use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::{
    entity::{payment, receipt},
    error::{BillingError, BillingResult},
    models::{Payment, PaymentResponse, Receipt, ReceiptResponse},
    repository::BillingRepository,
};

fn db_err(e: sea_orm::DbErr) -> BillingError {
    BillingError::Internal(format!("Database error: {}", e))
}

/// PostgreSQL implementation of BillingRepository
#[derive(Clone)]
pub struct PgBillingRepository {
    payments: BaseRepository<payment::Entity>,
    receipts: BaseRepository<receipt::Entity>,
}

impl PgBillingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            payments: BaseRepository::new(db.clone()),
            receipts: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.payments.db()
    }
}

#[async_trait]
impl BillingRepository for PgBillingRepository {
    async fn create_payment(&self, payment: Payment) -> BillingResult<Payment> {
        let model = self
            .payments
            .insert(payment::ActiveModel::from(payment))
            .await
            .map_err(db_err)?;

        tracing::info!(payment_id = %model.id, order_id = %model.order_id, "Created payment");
        Ok(model.into())
    }

    async fn get_payment(&self, id: Uuid) -> BillingResult<Option<Payment>> {
        Ok(self
            .payments
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .map(Into::into))
    }

    async fn get_payment_with_order(&self, id: Uuid) -> BillingResult<Option<PaymentResponse>> {
        let result = payment::Entity::find_by_id(id)
            .find_also_related(domain_orders::entity::order::Entity)
            .one(self.db())
            .await
            .map_err(db_err)?;

        Ok(result.map(|(payment, order)| PaymentResponse {
            payment: payment.into(),
            order: order.map(Into::into),
        }))
    }

    async fn list_payments(&self) -> BillingResult<Vec<Payment>> {
        let models = payment::Entity::find()
            .order_by_desc(payment::Column::CreatedAt)
            .all(self.db())
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create_receipt(&self, receipt: Receipt) -> BillingResult<Receipt> {
        let model = self
            .receipts
            .insert(receipt::ActiveModel::from(receipt))
            .await
            .map_err(db_err)?;

        tracing::info!(receipt_id = %model.id, order_id = %model.order_id, "Created receipt");
        Ok(model.into())
    }

    async fn get_receipt(&self, id: Uuid) -> BillingResult<Option<ReceiptResponse>> {
        let Some((model, order)) = receipt::Entity::find_by_id(id)
            .find_also_related(domain_orders::entity::order::Entity)
            .one(self.db())
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let payment = self
            .payments
            .find_by_id(model.payment_id)
            .await
            .map_err(db_err)?;

        Ok(Some(ReceiptResponse {
            receipt: model.into(),
            order: order.map(Into::into),
            payment: payment.map(Into::into),
        }))
    }

    async fn list_receipts(&self) -> BillingResult<Vec<ReceiptResponse>> {
        let rows = receipt::Entity::find()
            .find_also_related(domain_orders::entity::order::Entity)
            .order_by_desc(receipt::Column::IssuedAt)
            .all(self.db())
            .await
            .map_err(db_err)?;

        let mut responses = Vec::with_capacity(rows.len());
        for (model, order) in rows {
            let payment = self
                .payments
                .find_by_id(model.payment_id)
                .await
                .map_err(db_err)?;

            responses.push(ReceiptResponse {
                receipt: model.into(),
                order: order.map(Into::into),
                payment: payment.map(Into::into),
            });
        }

        Ok(responses)
    }
}
