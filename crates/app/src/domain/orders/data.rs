//! Order Data

use jiff::Timestamp;

use crate::domain::{
    orders::records::{OrderStatus, OrderUuid, PaymentStatus},
    products::records::ProductUuid,
};

/// New Order Model
///
/// The tenant comes from the transaction context rather than the data,
/// so an order can only land in the store it was authorized for.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub ticket: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_city: String,
    pub lines: Vec<NewOrderLine>,
    pub subtotal: u64,
    pub discount: u64,
    pub total: u64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub paid_at: Option<Timestamp>,
}

/// New Order Line Model
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
    pub unit_price: u64,
    pub subtotal: u64,
    pub image: Option<String>,
}
