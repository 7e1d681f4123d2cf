//! Test context for service-level integration tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    auth::{AuthServiceError, NewUser, PgAuthService, UserUuid},
    database::Db,
    domain::{
        products::PgProductsService,
        quotations::PgQuotationsService,
        tenants::{
            PgTenantsService, TenantsService, TenantsServiceError,
            data::NewTenant,
            records::{TenantRecord, TenantUuid},
        },
    },
    render::{DocumentRenderer, QuotationDocument, RenderError},
};

use super::db::TestDb;

/// Renderer double used instead of the external PDF service. Returns a
/// fixed payload so tests can assert on the encoded result.
pub(crate) struct StubRenderer;

#[async_trait]
impl DocumentRenderer for StubRenderer {
    async fn render_quotation_pdf(
        &self,
        _document: &QuotationDocument,
    ) -> Result<Vec<u8>, RenderError> {
        Ok(b"%PDF-1.4 stub".to_vec())
    }
}

pub struct TestContext {
    pub db: TestDb,
    pub products: PgProductsService,
    pub quotations: PgQuotationsService,

    /// Default store created for every context.
    pub tenant_uuid: TenantUuid,
    pub tenant_slug: String,

    /// Owner of the default store.
    pub owner_uuid: UserUuid,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let owner = PgAuthService::new(test_db.pool().clone())
            .create_user(NewUser {
                uuid: UserUuid::new(),
                email: "owner@feria.test".to_string(),
                name: "Owner".to_string(),
            })
            .await
            .expect("Failed to create default store owner");

        let tenant = PgTenantsService::new(test_db.pool().clone())
            .create_tenant(NewTenant {
                uuid: TenantUuid::new(),
                name: "Test Store".to_string(),
                slug: "test-store".to_string(),
                owner_uuid: owner.uuid,
            })
            .await
            .expect("Failed to create default test store");

        let tenants: Arc<dyn TenantsService> =
            Arc::new(PgTenantsService::new(test_db.pool().clone()));
        let renderer: Arc<dyn DocumentRenderer> = Arc::new(StubRenderer);

        Self {
            products: PgProductsService::new(db.clone()),
            quotations: PgQuotationsService::new(db, tenants, renderer),
            tenant_uuid: tenant.uuid,
            tenant_slug: tenant.slug,
            owner_uuid: owner.uuid,
            db: test_db,
        }
    }

    /// Create another user.
    pub async fn create_user(&self, email: &str) -> Result<UserUuid, AuthServiceError> {
        let user = PgAuthService::new(self.db.pool().clone())
            .create_user(NewUser {
                uuid: UserUuid::new(),
                email: email.to_string(),
                name: email.split('@').next().unwrap_or(email).to_string(),
            })
            .await?;

        Ok(user.uuid)
    }

    /// Create an additional store with its own owner — useful for
    /// isolation tests.
    pub async fn create_tenant(
        &self,
        name: &str,
        slug: &str,
    ) -> Result<TenantRecord, TenantsServiceError> {
        let owner = self
            .create_user(&format!("{slug}-owner@feria.test"))
            .await
            .expect("Failed to create store owner");

        PgTenantsService::new(self.db.pool().clone())
            .create_tenant(NewTenant {
                uuid: TenantUuid::new(),
                name: name.to_string(),
                slug: slug.to_string(),
                owner_uuid: owner,
            })
            .await
    }
}
