//! # Quotation Repository
//!
//! Quotation headers and their snapshot lines. Nothing here touches stock.
//!
//! Lines are never edited in place: an update deletes every line of the
//! quotation and inserts the new set inside the same transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{money, LineColumns};
use tlapa_core::pricing::PricedLine;
use tlapa_core::{Money, Quotation, QuotationDetail, QuotationLine, QuotationStatus};

#[derive(Debug, FromRow)]
struct QuotationRow {
    id: i64,
    created_at: DateTime<Utc>,
    client: String,
    payment_method: String,
    total: Decimal,
    status: QuotationStatus,
    user_id: i64,
    seller_name: Option<String>,
}

impl TryFrom<QuotationRow> for Quotation {
    type Error = DbError;

    fn try_from(row: QuotationRow) -> DbResult<Self> {
        Ok(Quotation {
            id: row.id,
            created_at: row.created_at,
            client: row.client,
            payment_method: row.payment_method,
            total: money("total", row.total)?,
            status: row.status,
            user_id: row.user_id,
            seller_name: row.seller_name,
        })
    }
}

#[derive(Debug, FromRow)]
struct QuotationLineRow {
    product_id: i64,
    description: String,
    quantity: i64,
    unit_price: Decimal,
    subtotal: Decimal,
    current_stock: Option<i64>,
}

impl TryFrom<QuotationLineRow> for QuotationLine {
    type Error = DbError;

    fn try_from(row: QuotationLineRow) -> DbResult<Self> {
        Ok(QuotationLine {
            product_id: row.product_id,
            description: row.description,
            quantity: row.quantity,
            unit_price: money("unit_price", row.unit_price)?,
            subtotal: money("subtotal", row.subtotal)?,
            current_stock: row.current_stock,
        })
    }
}

/// Header values written on create and on update.
#[derive(Debug, Clone)]
pub struct QuotationHeader<'a> {
    pub client: &'a str,
    pub payment_method: &'a str,
    pub total: Money,
}

/// Repository for quotation database operations.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    pool: PgPool,
}

impl QuotationRepository {
    /// Creates a new QuotationRepository.
    pub fn new(pool: PgPool) -> Self {
        QuotationRepository { pool }
    }

    /// Inserts a pending quotation header and returns its id.
    pub async fn insert_header(conn: &mut PgConnection, header: &QuotationHeader<'_>, user_id: i64) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO quotations (client, payment_method, total, status, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(header.client)
        .bind(header.payment_method)
        .bind(header.total.to_decimal())
        .bind(QuotationStatus::Pending)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        debug!(quotation_id = id, total = %header.total, "Inserted quotation header");
        Ok(id)
    }

    /// Locks a quotation header for the rest of the transaction.
    ///
    /// Returns `false` when the id does not exist.
    pub async fn lock(conn: &mut PgConnection, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM quotations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(found.is_some())
    }

    /// Overwrites header fields. Returns `false` when the id does not exist.
    pub async fn update_header(conn: &mut PgConnection, id: i64, header: &QuotationHeader<'_>) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE quotations SET client = $2, payment_method = $3, total = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(header.client)
        .bind(header.payment_method)
        .bind(header.total.to_decimal())
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Removes every line of a quotation. Returns the number removed.
    pub async fn delete_lines(conn: &mut PgConnection, quotation_id: i64) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM quotation_lines WHERE quotation_id = $1")
            .bind(quotation_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Inserts all lines of a quotation in one statement.
    pub async fn insert_lines(conn: &mut PgConnection, quotation_id: i64, lines: &[PricedLine]) -> DbResult<()> {
        let columns = LineColumns::from_lines(lines);

        let result = sqlx::query(
            r#"
            INSERT INTO quotation_lines (quotation_id, product_id, description, quantity, unit_price, subtotal)
            SELECT $1, l.product_id, l.description, l.quantity, l.unit_price, l.subtotal
            FROM UNNEST($2::bigint[], $3::text[], $4::bigint[], $5::numeric[], $6::numeric[])
                AS l(product_id, description, quantity, unit_price, subtotal)
            "#,
        )
        .bind(quotation_id)
        .bind(&columns.product_ids)
        .bind(&columns.descriptions)
        .bind(&columns.quantities)
        .bind(&columns.unit_prices)
        .bind(&columns.subtotals)
        .execute(&mut *conn)
        .await?;

        DbError::check_rows("insert quotation lines", columns.len(), result.rows_affected())
    }

    /// Deletes a quotation; its lines go with it (`ON DELETE CASCADE`).
    ///
    /// Returns `false` when the id does not exist.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM quotations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Lists quotations with the seller's name, most recent first.
    pub async fn list(&self, limit: i64) -> DbResult<Vec<Quotation>> {
        let rows: Vec<QuotationRow> = sqlx::query_as(
            r#"
            SELECT q.id, q.created_at, q.client, q.payment_method, q.total, q.status, q.user_id,
                   u.full_name AS seller_name
            FROM quotations q
            LEFT JOIN users u ON u.id = q.user_id
            ORDER BY q.created_at DESC, q.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Quotation::try_from).collect()
    }

    /// Gets a quotation with its lines.
    ///
    /// Each line carries the product's live stock next to the quoted
    /// quantity.
    pub async fn get(&self, id: i64) -> DbResult<Option<QuotationDetail>> {
        let header: Option<QuotationRow> = sqlx::query_as(
            r#"
            SELECT q.id, q.created_at, q.client, q.payment_method, q.total, q.status, q.user_id,
                   u.full_name AS seller_name
            FROM quotations q
            LEFT JOIN users u ON u.id = q.user_id
            WHERE q.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let lines: Vec<QuotationLineRow> = sqlx::query_as(
            r#"
            SELECT l.product_id, l.description, l.quantity, l.unit_price, l.subtotal,
                   p.stock AS current_stock
            FROM quotation_lines l
            LEFT JOIN products p ON p.id = l.product_id
            WHERE l.quotation_id = $1
            ORDER BY l.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(QuotationDetail {
            quotation: Quotation::try_from(header)?,
            lines: lines
                .into_iter()
                .map(QuotationLine::try_from)
                .collect::<DbResult<_>>()?,
        }))
    }
}
