//! Tenant Records

use jiff::Timestamp;

use crate::{auth::UserUuid, uuids::TypedUuid};

/// Tenant UUID
pub type TenantUuid = TypedUuid<TenantRecord>;

/// Tenant Record
///
/// A tenant is one store on the marketplace. The owner and any staff
/// members manage its catalog and quotations.
#[derive(Debug, Clone)]
pub struct TenantRecord {
    /// Unique tenant identifier.
    pub uuid: TenantUuid,

    /// Human-readable store name.
    pub name: String,

    /// URL-safe store identifier used in public browse routes.
    pub slug: String,

    /// User that owns the store.
    pub owner_uuid: UserUuid,

    /// Tenant creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}
