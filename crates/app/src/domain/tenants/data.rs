//! Tenant Data

use crate::{auth::UserUuid, domain::tenants::records::TenantUuid};

/// New Tenant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTenant {
    /// UUID to assign to the tenant row.
    pub uuid: TenantUuid,

    /// Store name to persist.
    pub name: String,

    /// URL-safe store identifier. Must be unique across the marketplace.
    pub slug: String,

    /// Owning user.
    pub owner_uuid: UserUuid,
}

/// New Staff Membership
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewStaffMember {
    /// Store the user joins.
    pub tenant_uuid: TenantUuid,

    /// User granted staff access.
    pub user_uuid: UserUuid,
}
