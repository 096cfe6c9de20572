use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::BillingResult;
use crate::models::{Payment, PaymentResponse, Receipt, ReceiptResponse};

/// Repository trait for Payment and Receipt persistence
#[async_trait]
pub trait BillingRepository: Send + Sync {
    async fn create_payment(&self, payment: Payment) -> BillingResult<Payment>;

    async fn get_payment(&self, id: Uuid) -> BillingResult<Option<Payment>>;

    /// Fetch a payment joined with its order
    async fn get_payment_with_order(&self, id: Uuid) -> BillingResult<Option<PaymentResponse>>;

    async fn list_payments(&self) -> BillingResult<Vec<Payment>>;

    async fn create_receipt(&self, receipt: Receipt) -> BillingResult<Receipt>;

    /// Fetch a receipt joined with its order and payment
    async fn get_receipt(&self, id: Uuid) -> BillingResult<Option<ReceiptResponse>>;

    async fn list_receipts(&self) -> BillingResult<Vec<ReceiptResponse>>;
}

/// In-memory implementation of BillingRepository (for development/testing).
///
/// Order relations live in another domain; the in-memory variant returns
/// them as `None`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBillingRepository {
    payments: Arc<RwLock<HashMap<Uuid, Payment>>>,
    receipts: Arc<RwLock<HashMap<Uuid, Receipt>>>,
}

impl InMemoryBillingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BillingRepository for InMemoryBillingRepository {
    async fn create_payment(&self, payment: Payment) -> BillingResult<Payment> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment.clone());
        tracing::info!(payment_id = %payment.id, order_id = %payment.order_id, "Created payment");
        Ok(payment)
    }

    async fn get_payment(&self, id: Uuid) -> BillingResult<Option<Payment>> {
        Ok(self.payments.read().await.get(&id).cloned())
    }

    async fn get_payment_with_order(&self, id: Uuid) -> BillingResult<Option<PaymentResponse>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).map(|p| PaymentResponse {
            payment: p.clone(),
            order: None,
        }))
    }

    async fn list_payments(&self) -> BillingResult<Vec<Payment>> {
        let payments = self.payments.read().await;
        let mut result: Vec<Payment> = payments.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn create_receipt(&self, receipt: Receipt) -> BillingResult<Receipt> {
        let mut receipts = self.receipts.write().await;
        receipts.insert(receipt.id, receipt.clone());
        tracing::info!(receipt_id = %receipt.id, order_id = %receipt.order_id, "Created receipt");
        Ok(receipt)
    }

    async fn get_receipt(&self, id: Uuid) -> BillingResult<Option<ReceiptResponse>> {
        let receipts = self.receipts.read().await;
        let payments = self.payments.read().await;

        Ok(receipts.get(&id).map(|r| ReceiptResponse {
            receipt: r.clone(),
            order: None,
            payment: payments.get(&r.payment_id).cloned(),
        }))
    }

    async fn list_receipts(&self) -> BillingResult<Vec<ReceiptResponse>> {
        let receipts = self.receipts.read().await;
        let payments = self.payments.read().await;

        let mut result: Vec<Receipt> = receipts.values().cloned().collect();
        result.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));

        Ok(result
            .into_iter()
            .map(|r| {
                let payment = payments.get(&r.payment_id).cloned();
                ReceiptResponse {
                    receipt: r,
                    order: None,
                    payment,
                }
            })
            .collect())
    }
}
