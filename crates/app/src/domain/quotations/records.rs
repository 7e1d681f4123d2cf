//! Quotation Records

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    auth::UserUuid,
    domain::{
        orders::records::OrderUuid, products::records::ProductUuid, tenants::records::TenantUuid,
    },
    uuids::TypedUuid,
};

/// Quotation UUID
pub type QuotationUuid = TypedUuid<QuotationRecord>;

/// Customer contact details captured with a quotation and copied onto
/// any order converted from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub city: String,
}

/// Quotation Record
///
/// A tenant-scoped price proposal built from one store's share of a
/// shopper's cart. Never deleted in normal flow; conversion links it to
/// the order it produced.
#[derive(Debug, Clone)]
pub struct QuotationRecord {
    pub uuid: QuotationUuid,

    /// Human-readable ticket, `COT-` followed by six timestamp digits
    /// and a three digit random suffix.
    pub ticket: String,

    pub tenant_uuid: TenantUuid,

    /// User that requested the quotation.
    pub user_uuid: UserUuid,

    pub customer: CustomerInfo,

    pub lines: Vec<QuotationLine>,

    /// Sum of line subtotals in minor currency units.
    pub subtotal: u64,

    pub discount: u64,

    /// `subtotal - discount`.
    pub total: u64,

    pub status: QuotationStatus,

    /// Staff notes recorded when the store responds.
    pub notes: Option<String>,

    /// Order produced by conversion, if any.
    pub order_uuid: Option<OrderUuid>,

    /// When store staff first saw the quotation in their inbox.
    pub admin_viewed_at: Option<Timestamp>,

    /// When the store responded with adjusted prices.
    pub responded_at: Option<Timestamp>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Quotation Line UUID
pub type QuotationLineUuid = TypedUuid<QuotationLine>;

/// Quotation Line Record
#[derive(Debug, Clone)]
pub struct QuotationLine {
    pub uuid: QuotationLineUuid,
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

/// Quotation Status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationStatus {
    Pending,
    Contacted,
    Converted,
}

impl QuotationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::Converted => "converted",
        }
    }
}

impl Display for QuotationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuotationStatus {
    type Err = ParseQuotationStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "contacted" => Ok(Self::Contacted),
            "converted" => Ok(Self::Converted),
            other => Err(ParseQuotationStatusError(other.to_owned())),
        }
    }
}

/// Error parsing a [`QuotationStatus`] from its stored form.
#[derive(Debug, Error)]
#[error("unknown quotation status: {0}")]
pub struct ParseQuotationStatusError(String);
