//! # Inventory Receipt Transaction
//!
//! Adds stock (and optionally replaces prices) for a batch of products in a
//! single UPDATE. There is no locked read first: the UPDATE takes its own
//! row locks, and the affected-row count tells us whether every product
//! existed and was active.
//!
//! ```text
//! entradas [(4, +10), (9, +2, precioVenta 35.5)]
//!      │
//!      ▼  validate every entry (first violation wins), merge repeats
//! BEGIN
//!      │  apply_bulk_delta(ActiveOnly)
//!      ▼
//! touched == distinct ids ? COMMIT : ROLLBACK + ProductsMissingOrInactive
//! ```

use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::product::{DeltaScope, ProductRepository};
use crate::transaction::log_rejection;
use tlapa_core::pricing::merge_receipt_entries;
use tlapa_core::validation::validate_receipt_entries;
use tlapa_core::{CoreError, Product, ReceiptEntry};

/// Applies an inventory receipt and returns the updated products,
/// ascending by id.
pub async fn apply_receipt(db: &Database, entries: &[ReceiptEntry]) -> DbResult<Vec<Product>> {
    let result = run(db, entries).await;
    if let Err(err) = &result {
        log_rejection("receipt", err);
    }
    result
}

async fn run(db: &Database, entries: &[ReceiptEntry]) -> DbResult<Vec<Product>> {
    validate_receipt_entries(entries)?;
    let deltas = merge_receipt_entries(entries)?;

    debug!(entries = entries.len(), products = deltas.len(), "Starting receipt");

    let mut tx = db.begin().await?;

    let updated = ProductRepository::apply_bulk_delta(&mut tx, &deltas, DeltaScope::ActiveOnly).await?;

    if updated.len() != deltas.len() {
        // tx is dropped here: rollback
        return Err(CoreError::ProductsMissingOrInactive {
            requested: deltas.len(),
            updated: updated.len(),
        }
        .into());
    }

    tx.commit().await?;

    info!(products = updated.len(), "Receipt committed");
    Ok(updated)
}
