//! # Quotation Transactions
//!
//! Create, replace and delete quotation snapshots. Product rows are read
//! without locks and stock is never touched.
//!
//! ```text
//! create:  read active products ─► price each line ─► header + lines
//! update:  lock header ─► read ─► price ─► overwrite header ─► delete lines ─► reinsert
//! delete:  DELETE header (lines cascade)
//! ```

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::product::ProductRepository;
use crate::repository::quotation::{QuotationHeader, QuotationRepository};
use crate::transaction::log_rejection;
use tlapa_core::pricing::{price_quotation_lines, QuotationPlan};
use tlapa_core::validation::validate_quotation_lines;
use tlapa_core::{CoreError, Money, QuotationInput};

/// Id and total of a written quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotationTotals {
    pub quotation_id: i64,
    pub total: Money,
}

/// Creates a pending quotation.
pub async fn create_quotation(db: &Database, user_id: i64, input: &QuotationInput) -> DbResult<QuotationTotals> {
    let result = create(db, user_id, input).await;
    if let Err(err) = &result {
        log_rejection("quotation create", err);
    }
    result
}

/// Replaces the header and every line of an existing quotation.
///
/// Blank client or payment method fall back to the defaults again.
pub async fn update_quotation(db: &Database, id: i64, input: &QuotationInput) -> DbResult<QuotationTotals> {
    let result = update(db, id, input).await;
    if let Err(err) = &result {
        log_rejection("quotation update", err);
    }
    result
}

/// Deletes a quotation and its lines.
pub async fn delete_quotation(db: &Database, id: i64) -> DbResult<()> {
    let result = match db.quotations().delete(id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(CoreError::QuotationNotFound(id).into()),
        Err(err) => Err(err),
    };

    match &result {
        Ok(()) => info!(quotation_id = id, "Quotation deleted"),
        Err(err) => log_rejection("quotation delete", err),
    }
    result
}

async fn create(db: &Database, user_id: i64, input: &QuotationInput) -> DbResult<QuotationTotals> {
    validate_quotation_lines(&input.lines)?;
    let client = input.client_or_default();
    let payment_method = input.payment_method_or_default();

    let mut tx = db.begin().await?;

    let plan = price(&mut tx, input).await?;
    let header = QuotationHeader {
        client: &client,
        payment_method: &payment_method,
        total: plan.total,
    };

    let quotation_id = QuotationRepository::insert_header(&mut tx, &header, user_id).await?;
    QuotationRepository::insert_lines(&mut tx, quotation_id, &plan.lines).await?;

    tx.commit().await?;

    info!(quotation_id, user_id, total = %plan.total, lines = plan.lines.len(), "Quotation created");

    Ok(QuotationTotals {
        quotation_id,
        total: plan.total,
    })
}

async fn update(db: &Database, id: i64, input: &QuotationInput) -> DbResult<QuotationTotals> {
    validate_quotation_lines(&input.lines)?;
    let client = input.client_or_default();
    let payment_method = input.payment_method_or_default();

    let mut tx = db.begin().await?;

    if !QuotationRepository::lock(&mut tx, id).await? {
        return Err(CoreError::QuotationNotFound(id).into());
    }

    let plan = price(&mut tx, input).await?;
    let header = QuotationHeader {
        client: &client,
        payment_method: &payment_method,
        total: plan.total,
    };

    if !QuotationRepository::update_header(&mut tx, id, &header).await? {
        return Err(CoreError::QuotationNotFound(id).into());
    }

    let removed = QuotationRepository::delete_lines(&mut tx, id).await?;
    QuotationRepository::insert_lines(&mut tx, id, &plan.lines).await?;

    tx.commit().await?;

    info!(quotation_id = id, removed, inserted = plan.lines.len(), total = %plan.total, "Quotation replaced");

    Ok(QuotationTotals {
        quotation_id: id,
        total: plan.total,
    })
}

/// Snapshot read of the referenced active products, then pricing.
async fn price(conn: &mut sqlx::PgConnection, input: &QuotationInput) -> DbResult<QuotationPlan> {
    let ids: Vec<i64> = input
        .lines
        .iter()
        .map(|line| line.product_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    debug!(products = ids.len(), lines = input.lines.len(), "Pricing quotation");

    let products = ProductRepository::fetch_active_by_ids(conn, &ids).await?;
    Ok(price_quotation_lines(&input.lines, &products)?)
}
