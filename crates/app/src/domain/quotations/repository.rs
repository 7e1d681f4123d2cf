//! Quotations Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json,
};
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    database::{bind_amount, bind_quantity, try_get_amount, try_get_quantity},
    domain::{
        orders::records::OrderUuid,
        quotations::{
            data::{NewQuotation, NewQuotationLine},
            events::{QuotationEventDetail, QuotationEventRecord},
            records::{
                CustomerInfo, ParseQuotationStatusError, QuotationLine, QuotationLineUuid,
                QuotationRecord, QuotationUuid,
            },
        },
    },
};

const CREATE_QUOTATION_SQL: &str = include_str!("sql/create_quotation.sql");
const CREATE_QUOTATION_LINE_SQL: &str = include_str!("sql/create_quotation_line.sql");
const GET_QUOTATION_SQL: &str = include_str!("sql/get_quotation.sql");
const GET_QUOTATION_LINES_SQL: &str = include_str!("sql/get_quotation_lines.sql");
const MARK_CONTACTED_SQL: &str = include_str!("sql/mark_contacted.sql");
const MARK_CONVERTED_SQL: &str = include_str!("sql/mark_converted.sql");
const MARK_VIEWED_PENDING_SQL: &str = include_str!("sql/mark_viewed_pending.sql");
const INSERT_QUOTATION_EVENT_SQL: &str = include_str!("sql/insert_quotation_event.sql");
const LIST_QUOTATION_EVENTS_SQL: &str = include_str!("sql/list_quotation_events.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgQuotationsRepository;

impl PgQuotationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Inserts the quotation row and all of its lines.
    pub(crate) async fn create_quotation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        quotation: &NewQuotation,
    ) -> Result<QuotationRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, QuotationRecord>(CREATE_QUOTATION_SQL)
            .bind(quotation.uuid.into_uuid())
            .bind(&quotation.ticket)
            .bind(quotation.user_uuid.into_uuid())
            .bind(&quotation.customer.name)
            .bind(&quotation.customer.phone)
            .bind(&quotation.customer.email)
            .bind(&quotation.customer.city)
            .bind(bind_amount(quotation.subtotal)?)
            .bind(bind_amount(quotation.discount)?)
            .bind(bind_amount(quotation.total)?)
            .fetch_one(&mut **tx)
            .await?;

        for line in &quotation.lines {
            let created = self.create_line(tx, record.uuid, line).await?;
            record.lines.push(created);
        }

        Ok(record)
    }

    async fn create_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        quotation: QuotationUuid,
        line: &NewQuotationLine,
    ) -> Result<QuotationLine, sqlx::Error> {
        query_as::<Postgres, QuotationLine>(CREATE_QUOTATION_LINE_SQL)
            .bind(QuotationLineUuid::new().into_uuid())
            .bind(quotation.into_uuid())
            .bind(line.product_uuid.into_uuid())
            .bind(&line.name)
            .bind(&line.size)
            .bind(&line.color)
            .bind(bind_quantity(line.quantity)?)
            .bind(bind_amount(line.unit_price)?)
            .bind(bind_amount(line.subtotal)?)
            .bind(&line.image)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_quotation(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        quotation: QuotationUuid,
    ) -> Result<QuotationRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, QuotationRecord>(GET_QUOTATION_SQL)
            .bind(quotation.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let lines = query_as::<Postgres, QuotationLine>(GET_QUOTATION_LINES_SQL)
            .bind(quotation.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        record.lines.extend(lines);

        Ok(record)
    }

    pub(crate) async fn mark_contacted(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        quotation: QuotationUuid,
        notes: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_CONTACTED_SQL)
            .bind(quotation.into_uuid())
            .bind(notes)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Flips a quotation to `converted` and links its order. Affects no
    /// rows when the quotation was already converted.
    pub(crate) async fn mark_converted(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        quotation: QuotationUuid,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_CONVERTED_SQL)
            .bind(quotation.into_uuid())
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Stamps every pending, unseen quotation of the current tenant.
    pub(crate) async fn mark_viewed_pending(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_VIEWED_PENDING_SQL)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn insert_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        quotation: QuotationUuid,
        actor: Option<UserUuid>,
        detail: &QuotationEventDetail,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_QUOTATION_EVENT_SQL)
            .bind(Uuid::now_v7())
            .bind(quotation.into_uuid())
            .bind(actor.map(UserUuid::into_uuid))
            .bind(detail.type_as_str())
            .bind(Json(detail))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_events(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        quotation: QuotationUuid,
    ) -> Result<Vec<QuotationEventRecord>, sqlx::Error> {
        query_as::<Postgres, QuotationEventRecord>(LIST_QUOTATION_EVENTS_SQL)
            .bind(quotation.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for QuotationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: QuotationUuid::from_uuid(row.try_get("uuid")?),
            ticket: row.try_get("ticket")?,
            tenant_uuid: row.try_get::<Uuid, _>("tenant_uuid")?.into(),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            customer: CustomerInfo {
                name: row.try_get("customer_name")?,
                phone: row.try_get("customer_phone")?,
                email: row.try_get("customer_email")?,
                city: row.try_get("customer_city")?,
            },
            lines: Vec::new(),
            subtotal: try_get_amount(row, "subtotal")?,
            discount: try_get_amount(row, "discount")?,
            total: try_get_amount(row, "total")?,
            status: row
                .try_get::<String, _>("status")?
                .parse()
                .map_err(
                    |source: ParseQuotationStatusError| sqlx::Error::ColumnDecode {
                        index: "status".to_string(),
                        source: Box::new(source),
                    },
                )?,
            notes: row.try_get("notes")?,
            order_uuid: row
                .try_get::<Option<Uuid>, _>("order_uuid")?
                .map(OrderUuid::from_uuid),
            admin_viewed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("admin_viewed_at")?
                .map(SqlxTimestamp::to_jiff),
            responded_at: row
                .try_get::<Option<SqlxTimestamp>, _>("responded_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for QuotationLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: QuotationLineUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: row.try_get::<Uuid, _>("product_uuid")?.into(),
            name: row.try_get("name")?,
            size: row.try_get("size")?,
            color: row.try_get("color")?,
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            subtotal: try_get_amount(row, "subtotal")?,
            image: row.try_get("image")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for QuotationEventRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            quotation_uuid: QuotationUuid::from_uuid(row.try_get("quotation_uuid")?),
            actor_uuid: row
                .try_get::<Option<Uuid>, _>("actor_uuid")?
                .map(UserUuid::from_uuid),
            event_type: row.try_get("event_type")?,
            detail: row
                .try_get::<Json<QuotationEventDetail>, _>("detail")?
                .0,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
