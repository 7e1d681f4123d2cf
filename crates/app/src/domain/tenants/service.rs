//! Tenants service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::{
    auth::UserUuid,
    domain::tenants::{
        data::{NewStaffMember, NewTenant},
        errors::TenantsServiceError,
        records::{TenantRecord, TenantUuid},
        repository::PgTenantsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgTenantsService {
    repository: PgTenantsRepository,
}

impl PgTenantsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgTenantsRepository::new(pool),
        }
    }
}

#[async_trait]
impl TenantsService for PgTenantsService {
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError> {
        self.repository
            .create_tenant(tenant)
            .await
            .map_err(Into::into)
    }

    async fn add_staff_member(&self, staff: NewStaffMember) -> Result<(), TenantsServiceError> {
        self.repository
            .add_staff_member(staff)
            .await
            .map_err(Into::into)
    }

    async fn find_for_user(&self, user: UserUuid) -> Result<TenantRecord, TenantsServiceError> {
        self.repository
            .find_tenant_for_user(user)
            .await?
            .ok_or(TenantsServiceError::NotFound)
    }

    async fn user_can_manage(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<bool, TenantsServiceError> {
        self.repository
            .user_can_manage(tenant, user)
            .await
            .map_err(Into::into)
    }
}

#[automock]
#[async_trait]
/// Tenant persistence operations.
pub trait TenantsService: Send + Sync {
    /// Creates a new store.
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError>;

    /// Grants a user staff access to a store.
    async fn add_staff_member(&self, staff: NewStaffMember) -> Result<(), TenantsServiceError>;

    /// Finds the store a user works for. Ownership wins over staff
    /// membership when the user has both.
    async fn find_for_user(&self, user: UserUuid) -> Result<TenantRecord, TenantsServiceError>;

    /// Whether a user may act for a store, as its owner or as staff.
    async fn user_can_manage(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<bool, TenantsServiceError>;
}
