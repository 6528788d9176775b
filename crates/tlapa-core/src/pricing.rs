//! # Pricing & Planning
//!
//! Turns locked (or snapshotted) product rows plus a request into the exact
//! rows a transaction will write.
//!
//! ## Sale Planning Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  AggregatedDemand {1 → 2, 4 → 5}      locked rows [#1, #4]              │
//! │           │                                  │                          │
//! │           └──────────────┬───────────────────┘                          │
//! │                          ▼                                              │
//! │                     plan_sale()                                         │
//! │                          │                                              │
//! │      ┌───────────────────┼─────────────────────┐                        │
//! │      ▼                   ▼                     ▼                        │
//! │  id missing?         inactive?            stock < qty?                  │
//! │  ProductsNotFound    ProductInactive      InsufficientStock             │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  SalePlan { lines (unit price copied), total = Σ subtotal, deltas }    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic is in integer cents, so `total == Σ subtotal` holds exactly.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::aggregate::AggregatedDemand;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{LineRequest, Product, ReceiptEntry, StockDelta};
use crate::validation::{ValidationResult, MAX_AMOUNT};

// =============================================================================
// Priced Lines
// =============================================================================

/// A line with its unit price copied from the product row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// Prices `quantity` units of `product` at its current sale price.
///
/// Fails when the subtotal is larger than [`MAX_AMOUNT`].
pub fn price_line(product: &Product, quantity: i64) -> ValidationResult<PricedLine> {
    let subtotal = product
        .sale_price
        .checked_multiply_quantity(quantity)
        .filter(|subtotal| *subtotal <= MAX_AMOUNT)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "cantidad".to_string(),
            reason: format!("subtotal for product {} exceeds maximum of {MAX_AMOUNT}", product.id),
        })?;

    Ok(PricedLine {
        product_id: product.id,
        description: product.description.clone(),
        quantity,
        unit_price: product.sale_price,
        subtotal,
    })
}

/// Sum of line subtotals, bounded by [`MAX_AMOUNT`].
pub fn total_of(lines: &[PricedLine]) -> ValidationResult<Money> {
    let cents = lines
        .iter()
        .try_fold(0i64, |acc, line| acc.checked_add(line.subtotal.cents()));

    match cents.map(Money::from_cents) {
        Some(total) if total <= MAX_AMOUNT => Ok(total),
        _ => Err(ValidationError::InvalidFormat {
            field: "total".to_string(),
            reason: format!("total exceeds maximum of {MAX_AMOUNT}"),
        }),
    }
}

// =============================================================================
// Sale Planning
// =============================================================================

/// Everything a sale writes, decided before the first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalePlan {
    /// One line per distinct product, ascending id.
    pub lines: Vec<PricedLine>,
    pub total: Money,
    /// Stock decrements, ascending id.
    pub deltas: Vec<StockDelta>,
}

/// Checks a sale against its locked rows and prices it.
///
/// `locked` must be the rows returned by the ledger's locked read for
/// `demand.ids()`. Checks run in ascending id order, so the reported
/// product is the lowest-id offender.
pub fn plan_sale(demand: &AggregatedDemand, locked: &[Product]) -> CoreResult<SalePlan> {
    let by_id: HashMap<i64, &Product> = locked.iter().map(|p| (p.id, p)).collect();

    let missing: Vec<i64> = demand.ids().into_iter().filter(|id| !by_id.contains_key(id)).collect();
    if !missing.is_empty() {
        return Err(CoreError::ProductsNotFound { ids: missing });
    }

    let mut lines = Vec::with_capacity(demand.len());

    for (product_id, quantity) in demand.iter() {
        let product = by_id[&product_id];

        if !product.is_active {
            return Err(CoreError::ProductInactive {
                product_id,
                description: product.description.clone(),
            });
        }

        if !product.can_fulfil(quantity) {
            return Err(CoreError::InsufficientStock {
                product_id,
                description: product.description.clone(),
                available: product.stock,
                requested: quantity,
            });
        }

        lines.push(price_line(product, quantity)?);
    }

    Ok(SalePlan {
        total: total_of(&lines)?,
        deltas: demand.decrements(),
        lines,
    })
}

// =============================================================================
// Quotation Pricing
// =============================================================================

/// Lines and total of a quotation snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationPlan {
    /// One line per requested line, request order, duplicates kept.
    pub lines: Vec<PricedLine>,
    pub total: Money,
}

/// Prices every requested line independently against `products`.
///
/// Quantities below one are quoted as one unit. Products absent from
/// `products` (unknown or inactive) fail with `ProductsNotFound`.
pub fn price_quotation_lines(requests: &[LineRequest], products: &[Product]) -> CoreResult<QuotationPlan> {
    let by_id: HashMap<i64, &Product> = products
        .iter()
        .filter(|p| p.is_active)
        .map(|p| (p.id, p))
        .collect();

    let missing: BTreeSet<i64> = requests
        .iter()
        .map(|r| r.product_id)
        .filter(|id| !by_id.contains_key(id))
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::ProductsNotFound {
            ids: missing.into_iter().collect(),
        });
    }

    let lines = requests
        .iter()
        .map(|request| price_line(by_id[&request.product_id], request.quantity.max(1)))
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(QuotationPlan {
        total: total_of(&lines)?,
        lines,
    })
}

// =============================================================================
// Receipt Merging
// =============================================================================

/// Collapses receipt entries naming the same product into one delta.
///
/// Quantities are summed; for each price, the last entry that supplied one
/// wins. Output is in ascending id order.
pub fn merge_receipt_entries(entries: &[ReceiptEntry]) -> ValidationResult<Vec<StockDelta>> {
    let mut merged: BTreeMap<i64, StockDelta> = BTreeMap::new();

    for entry in entries {
        match merged.get_mut(&entry.product_id) {
            None => {
                merged.insert(entry.product_id, StockDelta::from(*entry));
            }
            Some(delta) => {
                delta.delta = delta.delta.checked_add(entry.quantity).ok_or_else(|| {
                    ValidationError::InvalidFormat {
                        field: "cantidad".to_string(),
                        reason: format!("combined quantity for product {} overflows", entry.product_id),
                    }
                })?;
                if entry.purchase_price.is_some() {
                    delta.purchase_price = entry.purchase_price;
                }
                if entry.sale_price.is_some() {
                    delta.sale_price = entry.sale_price;
                }
            }
        }
    }

    Ok(merged.into_values().collect())
}

// =============================================================================
// Unit Tests
// =============================================================================
