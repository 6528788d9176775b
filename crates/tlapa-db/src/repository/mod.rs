//! # Repository Module
//!
//! Database repository implementations for Tlapa POS.
//!
//! ## Two Kinds of Methods
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Pool methods (&self)                 Ledger steps (conn: &mut PgConn) │
//! │  ─────────────────────                ──────────────────────────────   │
//! │  db.products().get_by_id(7)           ProductRepository::lock_and_fetch│
//! │  db.sales().list(50)                  ProductRepository::apply_bulk_.. │
//! │  db.quotations().get(3)               SaleRepository::insert_lines     │
//! │                                                                         │
//! │  One statement, autocommit            Run inside the caller's open     │
//! │                                       transaction (crate::transaction) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product ledger and catalog
//! - [`SaleRepository`](sale::SaleRepository) - Sale headers, lines, history
//! - [`QuotationRepository`](quotation::QuotationRepository) - Quotation snapshots

pub mod product;
pub mod quotation;
pub mod sale;

use rust_decimal::Decimal;
use tlapa_core::Money;

use crate::error::{DbError, DbResult};

/// Reads a NUMERIC(12,2) value back into cents.
pub(crate) fn money(column: &'static str, value: Decimal) -> DbResult<Money> {
    Money::from_decimal(value)
        .ok_or_else(|| DbError::Internal(format!("{column} value {value} out of range")))
}

/// Splits priced lines into the column arrays an UNNEST insert binds.
pub(crate) struct LineColumns {
    pub product_ids: Vec<i64>,
    pub descriptions: Vec<String>,
    pub quantities: Vec<i64>,
    pub unit_prices: Vec<Decimal>,
    pub subtotals: Vec<Decimal>,
}

impl LineColumns {
    pub fn from_lines(lines: &[tlapa_core::pricing::PricedLine]) -> Self {
        let mut columns = LineColumns {
            product_ids: Vec::with_capacity(lines.len()),
            descriptions: Vec::with_capacity(lines.len()),
            quantities: Vec::with_capacity(lines.len()),
            unit_prices: Vec::with_capacity(lines.len()),
            subtotals: Vec::with_capacity(lines.len()),
        };
        for line in lines {
            columns.product_ids.push(line.product_id);
            columns.descriptions.push(line.description.clone());
            columns.quantities.push(line.quantity);
            columns.unit_prices.push(line.unit_price.to_decimal());
            columns.subtotals.push(line.subtotal.to_decimal());
        }
        columns
    }

    pub fn len(&self) -> u64 {
        self.product_ids.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlapa_core::pricing::PricedLine;

    #[test]
    fn test_money_from_numeric() {
        assert_eq!(money("total", Decimal::new(1099, 2)).unwrap().cents(), 1099);
        assert!(money("total", Decimal::MAX).is_err());
    }

    #[test]
    fn test_line_columns() {
        let lines = vec![
            PricedLine {
                product_id: 3,
                description: "Pinza".to_string(),
                quantity: 2,
                unit_price: Money::from_cents(15000),
                subtotal: Money::from_cents(30000),
            },
            PricedLine {
                product_id: 1,
                description: "Clavo".to_string(),
                quantity: 10,
                unit_price: Money::from_cents(5),
                subtotal: Money::from_cents(50),
            },
        ];

        let columns = LineColumns::from_lines(&lines);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.product_ids, vec![3, 1]);
        assert_eq!(columns.subtotals[1], Decimal::new(50, 2));
        assert_eq!(columns.descriptions[0], "Pinza");
    }
}
