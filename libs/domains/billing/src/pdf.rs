//! Receipt PDF rendering.
//!
//! A single A4 page with the receipt header, order metadata, item lines, and
//! the warranty summary, using printpdf's builtin Helvetica so no font assets
//! are needed at runtime.

use crate::error::{BillingError, BillingResult};
use crate::models::Receipt;
use domain_orders::OrderItem;
use printpdf::{BuiltinFont, Mm, PdfDocument};

/// An item line as printed on the receipt: product name plus the item.
pub struct ReceiptLine {
    pub product_name: String,
    pub item: OrderItem,
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;

/// Render the receipt into PDF bytes.
pub fn render_receipt(receipt: &Receipt, lines: &[ReceiptLine]) -> BillingResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Receipt {}", receipt.id),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| BillingError::PdfRender(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| BillingError::PdfRender(e.to_string()))?;

    let layer = doc.get_page(page).get_layer(layer);

    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
    layer.use_text("Receipt", 25.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= 2.0 * LINE_HEIGHT_MM;

    for text in [
        format!("Receipt ID: {}", receipt.id),
        format!("Order ID: {}", receipt.order_id),
        format!("Payment ID: {}", receipt.payment_id),
        format!("Date: {}", receipt.issued_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Total Amount: {}", receipt.total_amount),
    ] {
        layer.use_text(text, 11.0, Mm(MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    y -= LINE_HEIGHT_MM;
    layer.use_text("Items:", 12.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= LINE_HEIGHT_MM;

    for line in lines {
        layer.use_text(
            format!(
                "- {}: {} x {}",
                line.product_name, line.item.quantity, line.item.price
            ),
            11.0,
            Mm(MARGIN_MM),
            Mm(y),
            &font,
        );
        y -= LINE_HEIGHT_MM;
    }

    y -= LINE_HEIGHT_MM;
    layer.use_text("Warranty Information:", 12.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= LINE_HEIGHT_MM;

    for info in &receipt.warranty_info {
        layer.use_text(
            format!(
                "- Product: {}, Warranty Period: {} months",
                info.product, info.warranty_period
            ),
            11.0,
            Mm(MARGIN_MM),
            Mm(y),
            &font,
        );
        y -= LINE_HEIGHT_MM;
    }

    doc.save_to_bytes()
        .map_err(|e| BillingError::PdfRender(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WarrantyInfo;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn receipt() -> Receipt {
        Receipt {
            id: Uuid::now_v7(),
            name: "Receipt for Order".to_string(),
            order_id: Uuid::now_v7(),
            payment_id: Uuid::now_v7(),
            issued_at: Utc::now(),
            total_amount: Decimal::new(2500, 2),
            warranty_info: vec![WarrantyInfo {
                product: "Lamp".to_string(),
                warranty_period: "12".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let lines = vec![ReceiptLine {
            product_name: "Lamp".to_string(),
            item: OrderItem {
                id: Uuid::now_v7(),
                order_id: None,
                product_id: Uuid::now_v7(),
                quantity: 2,
                price: Decimal::new(1250, 2),
            },
        }];

        let bytes = render_receipt(&receipt(), &lines).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_render_with_no_lines_still_succeeds() {
        let bytes = render_receipt(&receipt(), &[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
