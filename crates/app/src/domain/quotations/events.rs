//! Quotation Events
//!
//! Append-only audit trail of quotation transitions. Payloads are
//! closed tagged variants validated before persistence, not free-form
//! JSON.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::UserUuid, domain::quotations::records::QuotationUuid};

/// Quotation Event Record
#[derive(Debug, Clone)]
pub struct QuotationEventRecord {
    pub uuid: Uuid,
    pub quotation_uuid: QuotationUuid,

    /// User that caused the transition, when one was authenticated.
    pub actor_uuid: Option<UserUuid>,

    /// Stored event type, matching the detail variant.
    pub event_type: String,

    pub detail: QuotationEventDetail,

    pub created_at: Timestamp,
}

/// Structured payload persisted with each quotation transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuotationEventDetail {
    /// The quotation was created from a cart partition.
    Created { item_count: usize, total: u64 },

    /// The quotation was converted into an order.
    Converted { order_uuid: Uuid },
}

impl QuotationEventDetail {
    #[must_use]
    pub(crate) fn type_as_str(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Converted { .. } => "converted",
        }
    }
}
