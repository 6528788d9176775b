//! # Sale Transaction
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  formaPago + [(7, 2), (3, 1), (7, 3)]                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_payment_method + aggregate_line_items   (no DB yet)          │
//! │       │          {3 → 1, 7 → 5}                                         │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │  lock_and_fetch([3, 7])          FOR UPDATE, ascending                 │
//! │  plan_sale()                     missing / inactive / stock checks     │
//! │  insert_header()                 created_at = now()                    │
//! │  insert_lines()                  UNNEST, count verified                │
//! │  apply_bulk_delta(-1, -5)        count verified                        │
//! │  COMMIT                                                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::product::{DeltaScope, ProductRepository};
use crate::repository::sale::SaleRepository;
use crate::transaction::log_rejection;
use tlapa_core::aggregate::aggregate_line_items;
use tlapa_core::pricing::plan_sale;
use tlapa_core::validation::validate_payment_method;
use tlapa_core::{LineRequest, SaleReceipt};

/// Records a sale: stock is decremented and the sale is written, or
/// nothing changes at all.
///
/// ## Errors
/// - Validation: blank payment method, empty list, id or quantity `<= 0`
/// - NotFound: `ProductsNotFound` with the missing ids
/// - Conflict: `ProductInactive`, `InsufficientStock`
/// - Internal: storage failures, including lock timeouts
pub async fn record_sale(
    db: &Database,
    user_id: i64,
    payment_method: &str,
    lines: &[LineRequest],
) -> DbResult<SaleReceipt> {
    let result = run(db, user_id, payment_method, lines).await;
    if let Err(err) = &result {
        log_rejection("sale", err);
    }
    result
}

async fn run(db: &Database, user_id: i64, payment_method: &str, lines: &[LineRequest]) -> DbResult<SaleReceipt> {
    let payment_method = validate_payment_method(payment_method)?;
    let demand = aggregate_line_items(lines)?;
    let ids = demand.ids();

    debug!(user_id, products = ids.len(), requested_lines = lines.len(), "Starting sale");

    let mut tx = db.begin().await?;

    let locked = ProductRepository::lock_and_fetch(&mut tx, &ids).await?;
    let plan = plan_sale(&demand, &locked)?;

    let sale_id = SaleRepository::insert_header(&mut tx, plan.total, &payment_method, user_id).await?;
    SaleRepository::insert_lines(&mut tx, sale_id, &plan.lines).await?;

    let updated = ProductRepository::apply_bulk_delta(&mut tx, &plan.deltas, DeltaScope::Any).await?;
    DbError::check_rows("decrement stock", plan.deltas.len() as u64, updated.len() as u64)?;

    tx.commit().await?;

    info!(
        sale_id,
        user_id,
        total = %plan.total,
        items = plan.lines.len(),
        payment_method = %payment_method,
        "Sale committed"
    );

    Ok(SaleReceipt {
        sale_id,
        total: plan.total,
        payment_method,
        items_count: plan.lines.len(),
    })
}
