//! # Line-Item Aggregation
//!
//! Normalizes a raw line list into one demand per product.
//!
//! ```text
//! request:  [(7, 2), (3, 1), (7, 3)]
//!                      │
//!                      ▼
//! demand:   {3 → 1, 7 → 5}      ids() = [3, 7]
//! ```
//!
//! The ids come out in ascending order. That order is the lock order used by
//! the sale transaction, so two overlapping sales always acquire their row
//! locks in the same sequence and cannot deadlock on each other.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::types::{LineRequest, StockDelta};
use crate::validation::{validate_product_id, validate_quantity, ValidationResult};

/// Net requested quantity per distinct product, keyed in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedDemand {
    quantities: BTreeMap<i64, i64>,
}

impl AggregatedDemand {
    /// Distinct product ids, ascending.
    pub fn ids(&self) -> Vec<i64> {
        self.quantities.keys().copied().collect()
    }

    /// Combined quantity requested for `product_id`.
    pub fn quantity_of(&self, product_id: i64) -> Option<i64> {
        self.quantities.get(&product_id).copied()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// `(product_id, quantity)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.quantities.iter().map(|(&id, &qty)| (id, qty))
    }

    /// Negative stock deltas for every product, in ascending id order.
    pub fn decrements(&self) -> Vec<StockDelta> {
        self.iter()
            .map(|(id, qty)| StockDelta::decrement(id, qty))
            .collect()
    }
}

impl IntoIterator for AggregatedDemand {
    type Item = (i64, i64);
    type IntoIter = btree_map::IntoIter<i64, i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.quantities.into_iter()
    }
}

/// Sums the quantities of repeated product references.
///
/// ## Errors
/// - `Empty` when `lines` is empty
/// - `Item { .. }` wrapping the first line with an id or quantity `<= 0`
/// - `InvalidFormat` if a combined quantity overflows
///
/// ## Example
/// ```rust
/// use tlapa_core::aggregate::aggregate_line_items;
/// use tlapa_core::LineRequest;
///
/// let demand = aggregate_line_items(&[LineRequest::new(1, 2), LineRequest::new(1, 3)]).unwrap();
/// assert_eq!(demand.len(), 1);
/// assert_eq!(demand.quantity_of(1), Some(5));
/// ```
pub fn aggregate_line_items(lines: &[LineRequest]) -> ValidationResult<AggregatedDemand> {
    if lines.is_empty() {
        return Err(ValidationError::Empty {
            field: "productos".to_string(),
        });
    }

    let mut quantities = BTreeMap::new();

    for (index, line) in lines.iter().enumerate() {
        validate_product_id(line.product_id)
            .and_then(|_| validate_quantity(line.quantity))
            .map_err(|e| e.at_item(index, line.product_id))?;

        let total = quantities.entry(line.product_id).or_insert(0i64);
        *total = total
            .checked_add(line.quantity)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "cantidad".to_string(),
                reason: format!("combined quantity for product {} overflows", line.product_id),
            })?;
    }

    Ok(AggregatedDemand { quantities })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeats_are_summed() {
        let demand = aggregate_line_items(&[
            LineRequest::new(1, 2),
            LineRequest::new(1, 3),
        ])
        .unwrap();

        assert_eq!(demand.len(), 1);
        assert_eq!(demand.quantity_of(1), Some(5));
    }

    #[test]
    fn test_ids_ascending() {
        let demand = aggregate_line_items(&[
            LineRequest::new(9, 1),
            LineRequest::new(2, 1),
            LineRequest::new(5, 1),
            LineRequest::new(2, 4),
        ])
        .unwrap();

        assert_eq!(demand.ids(), vec![2, 5, 9]);
        assert_eq!(
            demand.iter().collect::<Vec<_>>(),
            vec![(2, 5), (5, 1), (9, 1)]
        );
    }

    #[test]
    fn test_decrements() {
        let demand = aggregate_line_items(&[LineRequest::new(3, 2), LineRequest::new(1, 1)]).unwrap();
        let deltas = demand.decrements();
        assert_eq!(deltas[0].product_id, 1);
        assert_eq!(deltas[0].delta, -1);
        assert_eq!(deltas[1].product_id, 3);
        assert_eq!(deltas[1].delta, -2);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            aggregate_line_items(&[]),
            Err(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn test_bad_lines_rejected() {
        let err = aggregate_line_items(&[LineRequest::new(1, 1), LineRequest::new(0, 1)]).unwrap_err();
        assert!(matches!(err, ValidationError::Item { index: 1, .. }));

        let err = aggregate_line_items(&[LineRequest::new(4, 0)]).unwrap_err();
        assert!(matches!(err, ValidationError::Item { index: 0, product_id: 4, .. }));

        assert!(aggregate_line_items(&[LineRequest::new(4, -3)]).is_err());
    }

    #[test]
    fn test_overflow_rejected() {
        let err = aggregate_line_items(&[
            LineRequest::new(1, i64::MAX),
            LineRequest::new(1, 1),
        ])
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }
}
