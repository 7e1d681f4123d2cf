//! Tenants Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    auth::UserUuid,
    domain::tenants::{
        data::{NewStaffMember, NewTenant},
        records::{TenantRecord, TenantUuid},
    },
};

const CREATE_TENANT_SQL: &str = include_str!("sql/create_tenant.sql");
const FIND_TENANT_FOR_OWNER_SQL: &str = include_str!("sql/find_tenant_for_owner.sql");
const FIND_TENANT_FOR_STAFF_SQL: &str = include_str!("sql/find_tenant_for_staff.sql");
const ADD_STAFF_MEMBER_SQL: &str = include_str!("sql/add_staff_member.sql");
const USER_CAN_MANAGE_SQL: &str = include_str!("sql/user_can_manage.sql");

#[derive(Debug, Clone)]
/// PostgreSQL-backed tenants repository.
pub(crate) struct PgTenantsRepository {
    pool: PgPool,
}

impl PgTenantsRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_tenant(
        &self,
        tenant: NewTenant,
    ) -> Result<TenantRecord, sqlx::Error> {
        query_as::<Postgres, TenantRecord>(CREATE_TENANT_SQL)
            .bind(tenant.uuid.into_uuid())
            .bind(tenant.name)
            .bind(tenant.slug)
            .bind(tenant.owner_uuid.into_uuid())
            .fetch_one(&self.pool)
            .await
    }

    /// Finds the store a user works for, preferring ownership over staff
    /// membership.
    pub(crate) async fn find_tenant_for_user(
        &self,
        user: UserUuid,
    ) -> Result<Option<TenantRecord>, sqlx::Error> {
        let owned = query_as::<Postgres, TenantRecord>(FIND_TENANT_FOR_OWNER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&self.pool)
            .await?;

        if owned.is_some() {
            return Ok(owned);
        }

        query_as::<Postgres, TenantRecord>(FIND_TENANT_FOR_STAFF_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn add_staff_member(
        &self,
        staff: NewStaffMember,
    ) -> Result<(), sqlx::Error> {
        query(ADD_STAFF_MEMBER_SQL)
            .bind(staff.tenant_uuid.into_uuid())
            .bind(staff.user_uuid.into_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub(crate) async fn user_can_manage(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(USER_CAN_MANAGE_SQL)
            .bind(tenant.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TenantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: TenantUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            owner_uuid: UserUuid::from_uuid(row.try_get("owner_uuid")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
