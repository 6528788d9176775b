//! # Sale Repository
//!
//! Database operations for sale headers and lines.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. INSERT HEADER  (inside the sale transaction)                       │
//! │     └── insert_header() → id, created_at = now() (tx start time)       │
//! │                                                                         │
//! │  2. INSERT LINES   (one UNNEST statement)                              │
//! │     └── insert_lines() → row count verified                            │
//! │                                                                         │
//! │  3. COMMIT         → immutable from here on                            │
//! │                                                                         │
//! │  4. READ           list() / get()                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no update or delete: a committed sale is history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{money, LineColumns};
use tlapa_core::pricing::PricedLine;
use tlapa_core::{Money, Sale, SaleDetail, SaleLine, SaleSummary};

#[derive(Debug, FromRow)]
struct SaleRow {
    id: i64,
    created_at: DateTime<Utc>,
    total: Decimal,
    payment_method: String,
    user_id: i64,
}

impl TryFrom<SaleRow> for Sale {
    type Error = DbError;

    fn try_from(row: SaleRow) -> DbResult<Self> {
        Ok(Sale {
            id: row.id,
            created_at: row.created_at,
            total: money("total", row.total)?,
            payment_method: row.payment_method,
            user_id: row.user_id,
        })
    }
}

#[derive(Debug, FromRow)]
struct SaleSummaryRow {
    #[sqlx(flatten)]
    sale: SaleRow,
    seller_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct SaleLineRow {
    product_id: i64,
    description: Option<String>,
    quantity: i64,
    unit_price: Decimal,
    subtotal: Decimal,
}

impl TryFrom<SaleLineRow> for SaleLine {
    type Error = DbError;

    fn try_from(row: SaleLineRow) -> DbResult<Self> {
        Ok(SaleLine {
            product_id: row.product_id,
            description: row.description,
            quantity: row.quantity,
            unit_price: money("unit_price", row.unit_price)?,
            subtotal: money("subtotal", row.subtotal)?,
        })
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: PgPool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale header and returns its id.
    pub async fn insert_header(
        conn: &mut PgConnection,
        total: Money,
        payment_method: &str,
        user_id: i64,
    ) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sales (total, payment_method, user_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(total.to_decimal())
        .bind(payment_method)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        debug!(sale_id = id, total = %total, "Inserted sale header");
        Ok(id)
    }

    /// Inserts all lines of a sale in one statement.
    pub async fn insert_lines(conn: &mut PgConnection, sale_id: i64, lines: &[PricedLine]) -> DbResult<()> {
        let columns = LineColumns::from_lines(lines);

        let result = sqlx::query(
            r#"
            INSERT INTO sale_lines (sale_id, product_id, quantity, unit_price, subtotal)
            SELECT $1, l.product_id, l.quantity, l.unit_price, l.subtotal
            FROM UNNEST($2::bigint[], $3::bigint[], $4::numeric[], $5::numeric[])
                AS l(product_id, quantity, unit_price, subtotal)
            "#,
        )
        .bind(sale_id)
        .bind(&columns.product_ids)
        .bind(&columns.quantities)
        .bind(&columns.unit_prices)
        .bind(&columns.subtotals)
        .execute(&mut *conn)
        .await?;

        DbError::check_rows("insert sale lines", columns.len(), result.rows_affected())
    }

    /// Lists sales, newest first, with the cashier's name.
    pub async fn list(&self, limit: i64) -> DbResult<Vec<SaleSummary>> {
        let rows: Vec<SaleSummaryRow> = sqlx::query_as(
            r#"
            SELECT s.id, s.created_at, s.total, s.payment_method, s.user_id,
                   u.full_name AS seller_name
            FROM sales s
            LEFT JOIN users u ON u.id = s.user_id
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(SaleSummary {
                    sale: Sale::try_from(row.sale)?,
                    seller_name: row.seller_name,
                })
            })
            .collect()
    }

    /// Gets a sale with its lines, in insertion order.
    pub async fn get(&self, id: i64) -> DbResult<Option<SaleDetail>> {
        let header: Option<SaleRow> = sqlx::query_as(
            "SELECT id, created_at, total, payment_method, user_id FROM sales WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let lines: Vec<SaleLineRow> = sqlx::query_as(
            r#"
            SELECT l.product_id, p.description, l.quantity, l.unit_price, l.subtotal
            FROM sale_lines l
            LEFT JOIN products p ON p.id = l.product_id
            WHERE l.sale_id = $1
            ORDER BY l.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(SaleDetail {
            sale: Sale::try_from(header)?,
            lines: lines
                .into_iter()
                .map(SaleLine::try_from)
                .collect::<DbResult<_>>()?,
        }))
    }
}
