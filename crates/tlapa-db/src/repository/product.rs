//! # Product Repository
//!
//! The product ledger: locked reads, bulk stock deltas and the catalog
//! operations around them.
//!
//! ## Ledger Primitives
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  lock_and_fetch([3, 7])                                                │
//! │    SELECT … WHERE id = ANY($1) ORDER BY id FOR UPDATE                  │
//! │    └── rows locked in ascending id order until COMMIT/ROLLBACK         │
//! │                                                                         │
//! │  apply_bulk_delta([{3, -2}, {7, -5}])                                  │
//! │    UPDATE products p SET stock = p.stock + d.delta, …                  │
//! │    FROM UNNEST($1, $2, …) AS d(…)                                      │
//! │    └── one statement, every touched row returned                       │
//! │                                                                         │
//! │  Price overrides carry an explicit "set" flag per row:                 │
//! │    CASE WHEN d.set_sale THEN d.sale_price ELSE p.sale_price END        │
//! │  so "keep the price" and "set the price" never depend on NULL.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::money;
use tlapa_core::validation::{validate_new_product, validate_patch};
use tlapa_core::{CoreError, NewProduct, Product, ProductPatch, StockDelta};

macro_rules! product_columns {
    () => {
        "id, code, barcode, description, location, stock, min_stock, max_stock, \
         purchase_price, sale_price, category_id, supplier_id, is_active, image"
    };
}

/// Row shape of `products` before NUMERIC → cents conversion.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    code: String,
    barcode: Option<String>,
    description: String,
    location: Option<String>,
    stock: i64,
    min_stock: i64,
    max_stock: i64,
    purchase_price: Decimal,
    sale_price: Decimal,
    category_id: Option<i64>,
    supplier_id: Option<i64>,
    is_active: bool,
    image: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> DbResult<Self> {
        Ok(Product {
            id: row.id,
            code: row.code,
            barcode: row.barcode,
            description: row.description,
            location: row.location,
            stock: row.stock,
            min_stock: row.min_stock,
            max_stock: row.max_stock,
            purchase_price: money("purchase_price", row.purchase_price)?,
            sale_price: money("sale_price", row.sale_price)?,
            category_id: row.category_id,
            supplier_id: row.supplier_id,
            is_active: row.is_active,
            image: row.image,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> DbResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Which rows a bulk delta may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaScope {
    /// Any matching row (sale decrements, rows already locked and checked).
    Any,
    /// Only active products (receipts).
    ActiveOnly,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: PgPool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Ledger steps (inside a caller-owned transaction)
    // =========================================================================

    /// Locks and reads the given products.
    ///
    /// `ids` must be distinct. Rows are locked in ascending id order and
    /// stay locked until the surrounding transaction ends. Inactive rows
    /// are returned too; the caller decides what inactive means.
    ///
    /// ## Errors
    /// `CoreError::ProductsNotFound` with the missing ids when fewer rows
    /// come back than were requested.
    pub async fn lock_and_fetch(conn: &mut PgConnection, ids: &[i64]) -> DbResult<Vec<Product>> {
        debug!(ids = ?ids, "Locking product rows");

        let rows: Vec<ProductRow> = sqlx::query_as(concat!(
            "SELECT ",
            product_columns!(),
            " FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        ))
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

        if rows.len() != ids.len() {
            let mut missing: Vec<i64> = ids
                .iter()
                .copied()
                .filter(|id| !rows.iter().any(|row| row.id == *id))
                .collect();
            missing.sort_unstable();
            return Err(CoreError::ProductsNotFound { ids: missing }.into());
        }

        into_products(rows)
    }

    /// Applies signed stock deltas (and optional price overrides) in one
    /// statement and returns the rows it touched, ascending by id.
    ///
    /// Callers compare the returned length against `deltas.len()`: a
    /// short count means a row was missing (or inactive under
    /// [`DeltaScope::ActiveOnly`]) and the transaction must be abandoned.
    pub async fn apply_bulk_delta(
        conn: &mut PgConnection,
        deltas: &[StockDelta],
        scope: DeltaScope,
    ) -> DbResult<Vec<Product>> {
        if deltas.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(deltas.len());
        let mut amounts = Vec::with_capacity(deltas.len());
        let mut set_purchase = Vec::with_capacity(deltas.len());
        let mut purchase_prices = Vec::with_capacity(deltas.len());
        let mut set_sale = Vec::with_capacity(deltas.len());
        let mut sale_prices = Vec::with_capacity(deltas.len());

        for delta in deltas {
            ids.push(delta.product_id);
            amounts.push(delta.delta);
            set_purchase.push(delta.purchase_price.is_some());
            purchase_prices.push(delta.purchase_price.unwrap_or_default().to_decimal());
            set_sale.push(delta.sale_price.is_some());
            sale_prices.push(delta.sale_price.unwrap_or_default().to_decimal());
        }

        debug!(rows = deltas.len(), ?scope, "Applying bulk stock delta");

        let mut rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            UPDATE products AS p
            SET
                stock = p.stock + d.delta,
                purchase_price = CASE WHEN d.set_purchase THEN d.purchase_price ELSE p.purchase_price END,
                sale_price = CASE WHEN d.set_sale THEN d.sale_price ELSE p.sale_price END,
                updated_at = now()
            FROM UNNEST($1::bigint[], $2::bigint[], $3::bool[], $4::numeric[], $5::bool[], $6::numeric[])
                AS d(id, delta, set_purchase, purchase_price, set_sale, sale_price)
            WHERE p.id = d.id
              AND (p.is_active OR NOT $7)
            RETURNING
                p.id, p.code, p.barcode, p.description, p.location, p.stock,
                p.min_stock, p.max_stock, p.purchase_price, p.sale_price,
                p.category_id, p.supplier_id, p.is_active, p.image
            "#,
        )
        .bind(&ids)
        .bind(&amounts)
        .bind(&set_purchase)
        .bind(&purchase_prices)
        .bind(&set_sale)
        .bind(&sale_prices)
        .bind(scope == DeltaScope::ActiveOnly)
        .fetch_all(&mut *conn)
        .await?;

        rows.sort_unstable_by_key(|row| row.id);
        into_products(rows)
    }

    /// Reads active products without locking (quotation snapshots).
    ///
    /// Unknown and inactive ids are simply absent from the result.
    pub async fn fetch_active_by_ids(conn: &mut PgConnection, ids: &[i64]) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(concat!(
            "SELECT ",
            product_columns!(),
            " FROM products WHERE id = ANY($1) AND is_active ORDER BY id"
        ))
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

        into_products(rows)
    }

    // =========================================================================
    // Catalog (pool, autocommit)
    // =========================================================================

    /// Gets a product by its ID, active or not.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(concat!(
            "SELECT ",
            product_columns!(),
            " FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Lists active products ordered by description.
    pub async fn list_active(&self, limit: i64) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(concat!(
            "SELECT ",
            product_columns!(),
            " FROM products WHERE is_active ORDER BY description, id LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_products(rows)
    }

    /// Lists active products at or below their minimum stock, emptiest first.
    pub async fn list_low_stock(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(concat!(
            "SELECT ",
            product_columns!(),
            " FROM products WHERE is_active AND stock <= min_stock ORDER BY stock, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_products(rows)
    }

    /// Counts active products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its generated id
    /// * `Err(Domain(Duplicate))` - code or barcode already taken
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        validate_new_product(product)?;

        let code = product.code.trim().to_string();
        let barcode = normalize(product.barcode.as_deref());

        debug!(code = %code, "Inserting product");

        self.ensure_unique(None, Some(&code), barcode.as_deref()).await?;

        let row: ProductRow = sqlx::query_as(concat!(
            "INSERT INTO products (code, barcode, description, location, stock, min_stock, max_stock, \
             purchase_price, sale_price, category_id, supplier_id, image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING ",
            product_columns!()
        ))
        .bind(&code)
        .bind(&barcode)
        .bind(product.description.trim())
        .bind(normalize(product.location.as_deref()))
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(product.max_stock)
        .bind(product.purchase_price.to_decimal())
        .bind(product.sale_price.to_decimal())
        .bind(product.category_id)
        .bind(product.supplier_id)
        .bind(normalize(product.image.as_deref()))
        .fetch_one(&self.pool)
        .await?;

        Product::try_from(row)
    }

    /// Applies a partial edit. Only supplied fields are written.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the row after the edit
    /// * `Err(Domain(ProductNotFound))` - id does not exist
    /// * `Err(Domain(Duplicate))` - new code or barcode belongs to another product
    pub async fn update(&self, id: i64, patch: &ProductPatch) -> DbResult<Product> {
        validate_patch(patch)?;

        if patch.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(id).into());
        }

        let code = patch.code.as_deref().map(|c| c.trim().to_string());
        let barcode = patch.barcode.as_ref().map(|b| normalize(b.as_deref()));
        self.ensure_unique(Some(id), code.as_deref(), barcode.as_ref().and_then(|b| b.as_deref()))
            .await?;

        debug!(id, "Updating product");

        let mut query = build_patch(id, patch, code, barcode);
        let row: Option<ProductRow> = query
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Product::try_from(row),
            None => Err(CoreError::ProductNotFound(id).into()),
        }
    }

    /// Soft-deletes a product.
    pub async fn deactivate(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deactivating product");

        let result = sqlx::query("UPDATE products SET is_active = FALSE, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ProductNotFound(id).into());
        }

        Ok(())
    }

    /// Fails with `Duplicate` when `code` or `barcode` is used by a product
    /// other than `exclude`. The unique constraints still back this up.
    async fn ensure_unique(&self, exclude: Option<i64>, code: Option<&str>, barcode: Option<&str>) -> DbResult<()> {
        if let Some(code) = code {
            let taken: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM products WHERE code = $1 AND id IS DISTINCT FROM $2)",
            )
            .bind(code)
            .bind(exclude)
            .fetch_one(&self.pool)
            .await?;
            if taken {
                return Err(CoreError::duplicate("codigo", code).into());
            }
        }

        if let Some(barcode) = barcode {
            let taken: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM products WHERE barcode = $1 AND id IS DISTINCT FROM $2)",
            )
            .bind(barcode)
            .bind(exclude)
            .fetch_one(&self.pool)
            .await?;
            if taken {
                return Err(CoreError::duplicate("codigoBarras", barcode).into());
            }
        }

        Ok(())
    }
}

/// Trims optional text; blank becomes NULL.
fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `UPDATE products SET <supplied columns> WHERE id = $n RETURNING …`
fn build_patch(
    id: i64,
    patch: &ProductPatch,
    code: Option<String>,
    barcode: Option<Option<String>>,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE products SET updated_at = now()");

    if let Some(code) = code {
        qb.push(", code = ").push_bind(code);
    }
    if let Some(barcode) = barcode {
        qb.push(", barcode = ").push_bind(barcode);
    }
    if let Some(description) = &patch.description {
        qb.push(", description = ").push_bind(description.trim().to_string());
    }
    if let Some(location) = &patch.location {
        qb.push(", location = ").push_bind(normalize(location.as_deref()));
    }
    if let Some(stock) = patch.stock {
        qb.push(", stock = ").push_bind(stock);
    }
    if let Some(min) = patch.min_stock {
        qb.push(", min_stock = ").push_bind(min);
    }
    if let Some(max) = patch.max_stock {
        qb.push(", max_stock = ").push_bind(max);
    }
    if let Some(price) = patch.purchase_price {
        qb.push(", purchase_price = ").push_bind(price.to_decimal());
    }
    if let Some(price) = patch.sale_price {
        qb.push(", sale_price = ").push_bind(price.to_decimal());
    }
    if let Some(category) = patch.category_id {
        qb.push(", category_id = ").push_bind(category);
    }
    if let Some(supplier) = patch.supplier_id {
        qb.push(", supplier_id = ").push_bind(supplier);
    }
    if let Some(image) = &patch.image {
        qb.push(", image = ").push_bind(normalize(image.as_deref()));
    }

    qb.push(" WHERE id = ").push_bind(id);
    qb.push(concat!(" RETURNING ", product_columns!()));
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlapa_core::Money;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Some("  A-3 ")), Some("A-3".to_string()));
        assert_eq!(normalize(Some("   ")), None);
        assert_eq!(normalize(None), None);
    }

    #[test]
    fn test_build_patch_only_supplied_fields() {
        let patch = ProductPatch {
            sale_price: Some(Money::from_cents(4550)),
            location: Some(None),
            ..Default::default()
        };

        let qb = build_patch(12, &patch, None, None);
        let sql = qb.sql();

        assert!(sql.starts_with("UPDATE products SET updated_at = now(), location = $1, sale_price = $2 WHERE id = $3"));
        assert!(!sql.contains("code ="));
        assert!(!sql.contains("purchase_price ="));
        assert!(sql.contains("RETURNING id, code"));
    }

    #[test]
    fn test_build_patch_nullable_and_code() {
        let patch = ProductPatch {
            category_id: Some(None),
            ..Default::default()
        };

        let qb = build_patch(1, &patch, Some("TOR-002".to_string()), Some(None));
        let sql = qb.sql();

        assert!(sql.contains("code = $1"));
        assert!(sql.contains("barcode = $2"));
        assert!(sql.contains("category_id = $3"));
        assert!(sql.contains("WHERE id = $4"));
    }

    #[test]
    fn test_row_conversion() {
        let row = ProductRow {
            id: 5,
            code: "MAR-16".to_string(),
            barcode: None,
            description: "Martillo 16oz".to_string(),
            location: Some("A-3".to_string()),
            stock: 4,
            min_stock: 2,
            max_stock: 20,
            purchase_price: Decimal::new(8000, 2),
            sale_price: Decimal::new(12950, 2),
            category_id: Some(1),
            supplier_id: None,
            is_active: true,
            image: None,
        };

        let product = Product::try_from(row).unwrap();
        assert_eq!(product.sale_price, Money::from_cents(12950));
        assert_eq!(product.purchase_price, Money::from_cents(8000));
    }
}
