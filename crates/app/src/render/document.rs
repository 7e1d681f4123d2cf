//! Render Documents

use jiff::Timestamp;
use serde::Serialize;

/// Quotation Document
///
/// Everything the rendering service needs to lay out a quotation PDF.
/// Amounts are minor currency units; the renderer owns formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationDocument {
    pub ticket: String,

    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_city: String,

    pub lines: Vec<DocumentLine>,

    /// Total before staff adjustments.
    pub original_total: u64,

    /// Total after staff adjustments.
    pub adjusted_total: u64,

    /// `original_total - adjusted_total`. Negative when staff marked
    /// prices up instead of down.
    pub total_discount: i64,

    /// Discount as a rounded percentage of the original total.
    pub discount_percentage: i64,

    pub notes: Option<String>,

    /// Offer expiry shown on the document.
    pub valid_until: Timestamp,
}

/// Render Document Line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentLine {
    pub name: String,
    pub quantity: u32,

    /// Unit price before adjustment.
    pub original_price: u64,

    /// Unit price offered to the customer.
    pub adjusted_price: u64,

    /// `adjusted_price * quantity`.
    pub subtotal: u64,
}
