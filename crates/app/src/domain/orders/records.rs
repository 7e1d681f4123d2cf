//! Order Records

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{products::records::ProductUuid, tenants::records::TenantUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
///
/// Orders exist only as the result of converting a quotation; nothing
/// in this crate mutates them afterwards.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,

    /// Human-readable ticket: the source quotation's ticket with its
    /// `COT-` prefix replaced by `ORD-`.
    pub ticket: String,

    pub tenant_uuid: TenantUuid,

    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_city: String,

    pub lines: Vec<OrderLine>,

    /// Sum of line subtotals in minor currency units.
    pub subtotal: u64,

    pub discount: u64,

    /// `subtotal - discount`.
    pub total: u64,

    pub status: OrderStatus,
    pub payment_status: PaymentStatus,

    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLine>;

/// Order Line Record
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub uuid: OrderLineUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,

    /// Unit price in minor currency units.
    pub unit_price: u64,

    /// `unit_price * quantity`.
    pub subtotal: u64,

    pub image: Option<String>,
}

/// Order Status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseOrderStatusError(other.to_owned())),
        }
    }
}

/// Error parsing an [`OrderStatus`] from its stored form.
#[derive(Debug, Error)]
#[error("unknown order status: {0}")]
pub struct ParseOrderStatusError(String);

/// Payment Status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ParsePaymentStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(ParsePaymentStatusError(other.to_owned())),
        }
    }
}

/// Error parsing a [`PaymentStatus`] from its stored form.
#[derive(Debug, Error)]
#[error("unknown payment status: {0}")]
pub struct ParsePaymentStatusError(String);
