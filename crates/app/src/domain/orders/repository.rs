//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{bind_amount, bind_quantity, try_get_amount, try_get_quantity},
    domain::orders::{
        data::NewOrder,
        records::{
            OrderLine, OrderLineUuid, OrderRecord, OrderUuid, ParseOrderStatusError,
            ParsePaymentStatusError,
        },
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_LINE_SQL: &str = include_str!("sql/create_order_line.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_LINES_SQL: &str = include_str!("sql/get_order_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Inserts the order row and all of its lines.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(&order.ticket)
            .bind(&order.customer_name)
            .bind(&order.customer_phone)
            .bind(&order.customer_email)
            .bind(&order.customer_city)
            .bind(bind_amount(order.subtotal)?)
            .bind(bind_amount(order.discount)?)
            .bind(bind_amount(order.total)?)
            .bind(order.status.as_str())
            .bind(order.payment_status.as_str())
            .bind(order.paid_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await?;

        for line in &order.lines {
            let created = query_as::<Postgres, OrderLine>(CREATE_ORDER_LINE_SQL)
                .bind(OrderLineUuid::new().into_uuid())
                .bind(record.uuid.into_uuid())
                .bind(line.product_uuid.into_uuid())
                .bind(&line.name)
                .bind(&line.size)
                .bind(&line.color)
                .bind(bind_quantity(line.quantity)?)
                .bind(bind_amount(line.unit_price)?)
                .bind(bind_amount(line.subtotal)?)
                .bind(&line.image)
                .fetch_one(&mut **tx)
                .await?;

            record.lines.push(created);
        }

        Ok(record)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let lines = query_as::<Postgres, OrderLine>(GET_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        record.lines.extend(lines);

        Ok(record)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            ticket: row.try_get("ticket")?,
            tenant_uuid: row.try_get::<uuid::Uuid, _>("tenant_uuid")?.into(),
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            customer_email: row.try_get("customer_email")?,
            customer_city: row.try_get("customer_city")?,
            lines: Vec::new(),
            subtotal: try_get_amount(row, "subtotal")?,
            discount: try_get_amount(row, "discount")?,
            total: try_get_amount(row, "total")?,
            status: row
                .try_get::<String, _>("status")?
                .parse()
                .map_err(|source: ParseOrderStatusError| sqlx::Error::ColumnDecode {
                    index: "status".to_string(),
                    source: Box::new(source),
                })?,
            payment_status: row
                .try_get::<String, _>("payment_status")?
                .parse()
                .map_err(|source: ParsePaymentStatusError| sqlx::Error::ColumnDecode {
                    index: "payment_status".to_string(),
                    source: Box::new(source),
                })?,
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderLineUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: row.try_get::<uuid::Uuid, _>("product_uuid")?.into(),
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
