//! Quotation Data

use std::str::FromStr;

use thiserror::Error;

use crate::{
    auth::UserUuid,
    domain::{
        products::records::ProductUuid,
        quotations::records::{CustomerInfo, QuotationUuid},
    },
};

/// City recorded when the customer does not provide one.
pub const DEFAULT_CUSTOMER_CITY: &str = "Santiago";

/// Customer Contact Model
///
/// Contact fields as they arrive from the request. Name and phone are
/// mandatory; a missing city falls back to [`DEFAULT_CUSTOMER_CITY`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub city: Option<String>,
}

/// New Quotation Model
#[derive(Debug, Clone)]
pub struct NewQuotation {
    pub uuid: QuotationUuid,
    pub ticket: String,
    pub user_uuid: UserUuid,
    pub customer: CustomerInfo,
    pub lines: Vec<NewQuotationLine>,
    pub subtotal: u64,
    pub discount: u64,
    pub total: u64,
}

/// New Quotation Line Model
#[derive(Debug, Clone)]
pub struct NewQuotationLine {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
    pub unit_price: u64,
    pub subtotal: u64,
    pub image: Option<String>,
}

/// Quotation Response Model
///
/// A store's answer to a pending quotation: per-line adjusted prices
/// plus how the customer-facing artifact should be produced.
#[derive(Debug, Clone)]
pub struct QuotationResponse {
    pub quotation_uuid: QuotationUuid,
    pub lines: Vec<ResponseLine>,
    pub notes: Option<String>,

    /// Offer validity window in days from now.
    pub valid_days: u32,

    pub format: ResponseFormat,
}

/// Response Line Model
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseLine {
    pub name: String,

    /// Unit price as quoted.
    pub original_price: u64,

    /// Unit price offered by staff.
    pub adjusted_price: u64,

    pub quantity: u32,
}

impl ResponseLine {
    #[must_use]
    pub fn original_subtotal(&self) -> u64 {
        self.original_price.saturating_mul(u64::from(self.quantity))
    }

    #[must_use]
    pub fn adjusted_subtotal(&self) -> u64 {
        self.adjusted_price.saturating_mul(u64::from(self.quantity))
    }
}

/// Response Format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Whatsapp,
    Pdf,
}

impl ResponseFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Whatsapp => "whatsapp",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = ParseResponseFormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "whatsapp" => Ok(Self::Whatsapp),
            "pdf" => Ok(Self::Pdf),
            other => Err(ParseResponseFormatError(other.to_owned())),
        }
    }
}

/// Error parsing a [`ResponseFormat`] from a request.
#[derive(Debug, Error)]
#[error("unknown response format: {0}")]
pub struct ParseResponseFormatError(String);

/// Response Artifact Model
///
/// What the caller hands to the customer after a store responds.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseArtifact {
    /// Deep link opening a prefilled WhatsApp conversation.
    Whatsapp { url: String },

    /// Base64-encoded PDF and the filename to save it under.
    Pdf { base64: String, filename: String },
}
