//! Database connection management

use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow, query};

use crate::domain::tenants::records::TenantUuid;

/// SQL used to set tenant context for row-level security.
pub const SET_TENANT_CONTEXT_SQL: &str = "SELECT set_config('app.current_tenant_uuid', $1, true)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction and set tenant context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting tenant context fails.
    pub async fn begin_tenant_transaction(
        &self,
        tenant: TenantUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_TENANT_CONTEXT_SQL)
            .bind(tenant.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    /// Begin a transaction without tenant context.
    ///
    /// Cross-tenant flows (quotation intake, conversion) authorize in code
    /// and must not be scoped to a single tenant up front.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Read a money column stored as `BIGINT` minor units into a `u64`.
///
/// # Errors
///
/// Returns a decode error when the stored value is negative.
pub(crate) fn try_get_amount(row: &PgRow, column: &str) -> Result<u64, sqlx::Error> {
    let amount: i64 = row.try_get(column)?;

    u64::try_from(amount).map_err(|source| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    })
}

/// Convert a `u64` minor-unit amount into the `BIGINT` bind type.
///
/// # Errors
///
/// Returns an encode error when the amount exceeds `i64::MAX`.
pub(crate) fn bind_amount(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|source| sqlx::Error::Encode(Box::new(source)))
}

/// Read a quantity column stored as `INTEGER` into a `u32`.
///
/// # Errors
///
/// Returns a decode error when the stored value is negative.
pub(crate) fn try_get_quantity(row: &PgRow, column: &str) -> Result<u32, sqlx::Error> {
    let quantity: i32 = row.try_get(column)?;

    u32::try_from(quantity).map_err(|source| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    })
}

/// Convert a `u32` quantity into the `INTEGER` bind type.
///
/// # Errors
///
/// Returns an encode error when the quantity exceeds `i32::MAX`.
pub(crate) fn bind_quantity(quantity: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity).map_err(|source| sqlx::Error::Encode(Box::new(source)))
}
