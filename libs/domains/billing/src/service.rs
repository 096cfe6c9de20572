use chrono::Utc;
use domain_orders::repository::OrderRepository;
use domain_warranties::repository::WarrantyRepository;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::{
    CreatePayment, CreateReceipt, Payment, PaymentResponse, Receipt, ReceiptResponse, WarrantyInfo,
};
use crate::pdf::{self, ReceiptLine};
use crate::repository::BillingRepository;

/// Join warranty periods for a receipt line, falling back to "No warranty".
pub fn warranty_summary(product_name: &str, periods: &[i32]) -> WarrantyInfo {
    let warranty_period = if periods.is_empty() {
        "No warranty".to_string()
    } else {
        periods
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    WarrantyInfo {
        product: product_name.to_string(),
        warranty_period,
    }
}

/// Service layer for payments and receipts.
#[derive(Clone)]
pub struct BillingService<B, O, W> {
    repository: Arc<B>,
    orders: Arc<O>,
    warranties: Arc<W>,
    receipt_dir: PathBuf,
}

impl<B, O, W> BillingService<B, O, W>
where
    B: BillingRepository,
    O: OrderRepository,
    W: WarrantyRepository,
{
    pub fn new(repository: B, orders: O, warranties: W, receipt_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository: Arc::new(repository),
            orders: Arc::new(orders),
            warranties: Arc::new(warranties),
            receipt_dir: receipt_dir.into(),
        }
    }

    fn receipt_path(&self, receipt_id: Uuid) -> PathBuf {
        self.receipt_dir.join(format!("receipt-{}.pdf", receipt_id))
    }

    // Payments

    /// Create a payment for a pending order, capturing the order's total and
    /// payment method.
    pub async fn create_payment(&self, input: CreatePayment) -> BillingResult<Payment> {
        let order = self
            .orders
            .get_order(input.order_id)
            .await
            .map_err(|e| BillingError::Internal(e.to_string()))?
            .ok_or(BillingError::OrderNotFound(input.order_id))?;

        if order.total <= Decimal::ZERO {
            return Err(BillingError::OrderTotalNotPositive);
        }

        if order.status != domain_orders::OrderStatus::Pending {
            return Err(BillingError::OrderNotPending);
        }

        self.repository
            .create_payment(Payment::from_order(&order))
            .await
    }

    pub async fn get_payment(&self, id: Uuid) -> BillingResult<PaymentResponse> {
        self.repository
            .get_payment_with_order(id)
            .await?
            .ok_or(BillingError::PaymentNotFound(id))
    }

    pub async fn list_payments(&self) -> BillingResult<Vec<Payment>> {
        self.repository.list_payments().await
    }

    // Receipts

    /// Persist a receipt for an order/payment pair and render its PDF to
    /// `<receipt_dir>/receipt-<id>.pdf`.
    pub async fn generate_receipt(&self, input: CreateReceipt) -> BillingResult<Receipt> {
        let order = self
            .orders
            .get_order_with_relations(input.order_id)
            .await
            .map_err(|e| BillingError::Internal(e.to_string()))?
            .ok_or(BillingError::OrderNotFound(input.order_id))?;

        let payment = self
            .repository
            .get_payment(input.payment_id)
            .await?
            .ok_or(BillingError::PaymentNotFound(input.payment_id))?;

        // One summary line per item: product name plus its warranty periods
        let mut warranty_info = Vec::with_capacity(order.items.len());
        let mut lines = Vec::with_capacity(order.items.len());

        for entry in &order.items {
            let product_name = entry
                .product
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "Unknown product".to_string());

            let periods: Vec<i32> = self
                .warranties
                .all_for_product(entry.item.product_id)
                .await
                .map_err(|e| BillingError::Internal(e.to_string()))?
                .iter()
                .map(|w| w.period)
                .collect();

            warranty_info.push(warranty_summary(&product_name, &periods));
            lines.push(ReceiptLine {
                product_name,
                item: entry.item.clone(),
            });
        }

        let receipt = Receipt {
            id: Uuid::now_v7(),
            name: format!("Receipt for Order {}", input.order_id),
            order_id: input.order_id,
            payment_id: payment.id,
            issued_at: Utc::now(),
            total_amount: order.order.total,
            warranty_info,
        };

        let saved = self.repository.create_receipt(receipt).await?;

        let bytes = pdf::render_receipt(&saved, &lines)?;
        self.write_pdf(&self.receipt_path(saved.id), &bytes).await?;

        tracing::info!(receipt_id = %saved.id, "Generated receipt PDF");
        Ok(saved)
    }

    pub async fn get_receipt(&self, id: Uuid) -> BillingResult<ReceiptResponse> {
        self.repository
            .get_receipt(id)
            .await?
            .ok_or(BillingError::ReceiptNotFound(id))
    }

    pub async fn list_receipts(&self) -> BillingResult<Vec<ReceiptResponse>> {
        self.repository.list_receipts().await
    }

    /// Resolve the PDF path for a stored receipt, verifying the file exists.
    pub async fn receipt_pdf_path(&self, id: Uuid) -> BillingResult<PathBuf> {
        self.repository
            .get_receipt(id)
            .await?
            .ok_or(BillingError::ReceiptNotFound(id))?;

        let path = self.receipt_path(id);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Ok(path),
            Ok(false) => Err(BillingError::PdfMissing),
            Err(e) => Err(BillingError::Internal(format!(
                "Failed to stat receipt file: {}",
                e
            ))),
        }
    }

    async fn write_pdf(&self, path: &Path, bytes: &[u8]) -> BillingResult<()> {
        tokio::fs::create_dir_all(&self.receipt_dir)
            .await
            .map_err(|e| BillingError::Internal(format!("Failed to create receipt dir: {}", e)))?;

        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| BillingError::Internal(format!("Failed to store receipt: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryBillingRepository;
    use domain_orders::{InMemoryOrderRepository, Order, OrderItem, OrderStatus, PaymentMethod};
    use domain_warranties::{CreateWarranty, InMemoryWarrantyRepository, Warranty};

    type TestService =
        BillingService<InMemoryBillingRepository, InMemoryOrderRepository, InMemoryWarrantyRepository>;

    struct Fixture {
        service: TestService,
        orders: InMemoryOrderRepository,
        warranties: InMemoryWarrantyRepository,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let orders = InMemoryOrderRepository::new();
        let warranties = InMemoryWarrantyRepository::new();
        Fixture {
            service: BillingService::new(
                InMemoryBillingRepository::new(),
                orders.clone(),
                warranties.clone(),
                dir.path(),
            ),
            orders,
            warranties,
            _dir: dir,
        }
    }

    async fn seeded_order(orders: &InMemoryOrderRepository, status: OrderStatus) -> Order {
        let item = orders
            .create_item(OrderItem {
                id: Uuid::now_v7(),
                order_id: None,
                product_id: Uuid::now_v7(),
                quantity: 2,
                price: Decimal::new(1250, 2),
            })
            .await
            .unwrap();

        let now = Utc::now();
        let mut order = orders
            .insert_order_with_items(
                Order {
                    id: Uuid::now_v7(),
                    customer_id: Uuid::now_v7(),
                    total: Decimal::ZERO,
                    status: OrderStatus::Pending,
                    payment_method: PaymentMethod::Card,
                    created_at: now,
                    updated_at: now,
                },
                &[item.id],
            )
            .await
            .unwrap();

        if status != OrderStatus::Pending {
            order.status = status;
            order = orders.update_order(order, None).await.unwrap();
        }

        order
    }

    #[test]
    fn test_warranty_summary_joins_periods() {
        let info = warranty_summary("Lamp", &[12, 24]);
        assert_eq!(info.warranty_period, "12, 24");

        let none = warranty_summary("Lamp", &[]);
        assert_eq!(none.warranty_period, "No warranty");
    }

    #[tokio::test]
    async fn test_create_payment_captures_order_total() {
        let fx = fixture();
        let order = seeded_order(&fx.orders, OrderStatus::Pending).await;

        let payment = fx
            .service
            .create_payment(CreatePayment { order_id: order.id })
            .await
            .unwrap();

        assert_eq!(payment.amount, Decimal::new(2500, 2));
        assert_eq!(payment.method, "card");
        assert_eq!(payment.status, crate::models::PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_create_payment_requires_pending_order() {
        let fx = fixture();
        let order = seeded_order(&fx.orders, OrderStatus::Shipped).await;

        let result = fx
            .service
            .create_payment(CreatePayment { order_id: order.id })
            .await;
        assert!(matches!(result, Err(BillingError::OrderNotPending)));
    }

    #[tokio::test]
    async fn test_create_payment_rejects_zero_total() {
        let fx = fixture();
        let now = Utc::now();
        // An order with no items has a zero total
        let order = fx
            .orders
            .insert_order_with_items(
                Order {
                    id: Uuid::now_v7(),
                    customer_id: Uuid::now_v7(),
                    total: Decimal::ZERO,
                    status: OrderStatus::Pending,
                    payment_method: PaymentMethod::Card,
                    created_at: now,
                    updated_at: now,
                },
                &[],
            )
            .await
            .unwrap();

        let result = fx
            .service
            .create_payment(CreatePayment { order_id: order.id })
            .await;
        assert!(matches!(result, Err(BillingError::OrderTotalNotPositive)));
    }

    #[tokio::test]
    async fn test_create_payment_unknown_order() {
        let fx = fixture();
        let result = fx
            .service
            .create_payment(CreatePayment {
                order_id: Uuid::now_v7(),
            })
            .await;
        assert!(matches!(result, Err(BillingError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_generate_receipt_writes_pdf_and_summarizes_warranties() {
        let fx = fixture();
        let order = seeded_order(&fx.orders, OrderStatus::Pending).await;

        // One item; give its product a warranty
        let items = fx.orders.items_for_order(order.id).await.unwrap();
        let product_id = items[0].product_id;
        fx.warranties
            .create_if_no_overlap(Warranty::new(CreateWarranty {
                product_id,
                period: 12,
                start_date: Utc::now().date_naive(),
                details: String::new(),
            }))
            .await
            .unwrap();

        let payment = fx
            .service
            .create_payment(CreatePayment { order_id: order.id })
            .await
            .unwrap();

        let receipt = fx
            .service
            .generate_receipt(CreateReceipt {
                order_id: order.id,
                payment_id: payment.id,
            })
            .await
            .unwrap();

        assert_eq!(receipt.total_amount, Decimal::new(2500, 2));
        assert_eq!(receipt.warranty_info.len(), 1);
        assert_eq!(receipt.warranty_info[0].warranty_period, "12");

        let path = fx.service.receipt_pdf_path(receipt.id).await.unwrap();
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_generate_receipt_requires_payment() {
        let fx = fixture();
        let order = seeded_order(&fx.orders, OrderStatus::Pending).await;

        let result = fx
            .service
            .generate_receipt(CreateReceipt {
                order_id: order.id,
                payment_id: Uuid::now_v7(),
            })
            .await;
        assert!(matches!(result, Err(BillingError::PaymentNotFound(_))));
    }

    #[tokio::test]
    async fn test_receipt_pdf_path_missing_file() {
        let fx = fixture();
        let order = seeded_order(&fx.orders, OrderStatus::Pending).await;
        let payment = fx
            .service
            .create_payment(CreatePayment { order_id: order.id })
            .await
            .unwrap();
        let receipt = fx
            .service
            .generate_receipt(CreateReceipt {
                order_id: order.id,
                payment_id: payment.id,
            })
            .await
            .unwrap();

        // Remove the rendered file out from under the service
        let path = fx.service.receipt_pdf_path(receipt.id).await.unwrap();
        std::fs::remove_file(path).unwrap();

        let result = fx.service.receipt_pdf_path(receipt.id).await;
        assert!(matches!(result, Err(BillingError::PdfMissing)));
    }
}
