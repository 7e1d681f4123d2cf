//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        products::{PgProductsService, ProductsService},
        quotations::{PgQuotationsService, QuotationsService},
        tenants::{PgTenantsService, TenantsService},
    },
    render::DocumentRenderer,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Service handles shared by every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub products: Arc<dyn ProductsService>,
    pub quotations: Arc<dyn QuotationsService>,
    pub tenants: Arc<dyn TenantsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());

        let tenants: Arc<dyn TenantsService> = Arc::new(PgTenantsService::new(pool.clone()));

        Ok(Self {
            auth: Arc::new(PgAuthService::new(pool)),
            products: Arc::new(PgProductsService::new(db.clone())),
            quotations: Arc::new(PgQuotationsService::new(db, tenants.clone(), renderer)),
            tenants,
        })
    }
}
