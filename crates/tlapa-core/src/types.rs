//! # Domain Types
//!
//! Core domain types used throughout Tlapa POS.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │   Quotation     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  code (unique)  │   │  total          │   │  client         │       │
//! │  │  stock (>= 0)   │   │  payment_method │   │  status         │       │
//! │  │  sale_price     │   │  lines[]        │   │  lines[]        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Requests (input side)                                                 │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  LineRequest    │   │  ReceiptEntry   │   │  ProductPatch   │       │
//! │  │  (id, qty)      │   │  (id, +qty,     │   │  only supplied  │       │
//! │  │  repeats ok     │   │   price opts)   │   │  fields written │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines (sale and quotation) reference products weakly: they copy the id,
//! the unit price and, for quotations, the description at the moment they
//! are written. Editing a product later never rewrites history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog item with a stock quantity and purchase/sale prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Business code, unique across the catalog.
    pub code: String,

    /// Barcode (EAN-13, UPC-A, etc.), unique when present.
    pub barcode: Option<String>,

    /// Name shown to the cashier and copied onto quotation lines.
    pub description: String,

    /// Shelf / aisle reference.
    pub location: Option<String>,

    /// Units on hand. Never negative.
    pub stock: i64,

    pub min_stock: i64,
    pub max_stock: i64,

    pub purchase_price: Money,
    pub sale_price: Money,

    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,

    /// Soft-delete flag. Inactive products cannot be sold or quoted.
    pub is_active: bool,

    /// Reference to an externally stored image.
    pub image: Option<String>,
}

impl Product {
    /// Checks whether `quantity` units can be taken from stock.
    #[inline]
    pub fn can_fulfil(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Stock at or below the configured minimum.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

/// Fields for a new catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    pub code: String,
    pub barcode: Option<String>,
    pub description: String,
    pub location: Option<String>,
    pub stock: i64,
    pub min_stock: i64,
    pub max_stock: i64,
    pub purchase_price: Money,
    pub sale_price: Money,
    pub category_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub image: Option<String>,
}

/// A partial product edit.
///
/// `None` means "leave the column alone". For nullable columns the inner
/// `Option` distinguishes "set to NULL" (`Some(None)`) from "not supplied".
///
/// ```text
/// patch.barcode = None              → barcode untouched
/// patch.barcode = Some(None)        → barcode = NULL
/// patch.barcode = Some(Some("75…")) → barcode = '75…'
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub code: Option<String>,
    pub barcode: Option<Option<String>>,
    pub description: Option<String>,
    pub location: Option<Option<String>>,
    pub stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub purchase_price: Option<Money>,
    pub sale_price: Option<Money>,
    pub category_id: Option<Option<i64>>,
    pub supplier_id: Option<Option<i64>>,
    pub image: Option<Option<String>>,
}

impl ProductPatch {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.barcode.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.stock.is_none()
            && self.min_stock.is_none()
            && self.max_stock.is_none()
            && self.purchase_price.is_none()
            && self.sale_price.is_none()
            && self.category_id.is_none()
            && self.supplier_id.is_none()
            && self.image.is_none()
    }
}

// =============================================================================
// Ledger Inputs
// =============================================================================

/// One requested line of a sale or quotation: `(product id, quantity)`.
///
/// A request may name the same product more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    pub product_id: i64,
    pub quantity: i64,
}

impl LineRequest {
    pub const fn new(product_id: i64, quantity: i64) -> Self {
        LineRequest {
            product_id,
            quantity,
        }
    }
}

/// One entry of an inventory receipt.
///
/// Prices are already rounded to cents; `None` keeps the current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptEntry {
    pub product_id: i64,
    pub quantity: i64,
    pub purchase_price: Option<Money>,
    pub sale_price: Option<Money>,
}

impl ReceiptEntry {
    pub const fn new(product_id: i64, quantity: i64) -> Self {
        ReceiptEntry {
            product_id,
            quantity,
            purchase_price: None,
            sale_price: None,
        }
    }

    pub const fn with_prices(mut self, purchase: Option<Money>, sale: Option<Money>) -> Self {
        self.purchase_price = purchase;
        self.sale_price = sale;
        self
    }
}

/// A signed stock change for one product, with optional price overrides.
///
/// Sales produce negative deltas without overrides; receipts produce
/// positive deltas that may carry new prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDelta {
    pub product_id: i64,
    pub delta: i64,
    pub purchase_price: Option<Money>,
    pub sale_price: Option<Money>,
}

impl StockDelta {
    pub const fn decrement(product_id: i64, quantity: i64) -> Self {
        StockDelta {
            product_id,
            delta: -quantity,
            purchase_price: None,
            sale_price: None,
        }
    }
}

impl From<ReceiptEntry> for StockDelta {
    fn from(entry: ReceiptEntry) -> Self {
        StockDelta {
            product_id: entry.product_id,
            delta: entry.quantity,
            purchase_price: entry.purchase_price,
            sale_price: entry.sale_price,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: i64,

    /// Transaction start time of the sale.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Sum of all line subtotals.
    pub total: Money,

    pub payment_method: String,

    /// Cashier that rang the sale.
    pub user_id: i64,
}

/// A sale header plus the cashier's name, for history listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleSummary {
    pub sale: Sale,
    pub seller_name: Option<String>,
}

/// One line of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    pub product_id: i64,

    /// Current product description (joined on read, not snapshotted).
    pub description: Option<String>,

    pub quantity: i64,

    /// Sale price copied at transaction time.
    pub unit_price: Money,

    /// `unit_price × quantity`.
    pub subtotal: Money,
}

/// Sale header with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    pub sale: Sale,
    pub lines: Vec<SaleLine>,
}

/// What a committed sale reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleReceipt {
    pub sale_id: i64,
    pub total: Money,
    pub payment_method: String,
    pub items_count: usize,
}

// =============================================================================
// Quotation
// =============================================================================

/// Lifecycle of a quotation. New quotations start as `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "quotation_status", rename_all = "lowercase")
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    #[default]
    Pending,
    Accepted,
    Cancelled,
}

/// A quotation header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quotation {
    pub id: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    pub client: String,
    pub payment_method: String,
    pub total: Money,
    pub status: QuotationStatus,
    pub user_id: i64,

    /// Name of the user that wrote the quotation (joined on read).
    pub seller_name: Option<String>,
}

/// One line of a quotation, snapshotted when the quotation was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationLine {
    pub product_id: i64,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,

    /// Stock of the product right now, not when quoted. `None` once the
    /// product row is gone.
    pub current_stock: Option<i64>,
}

/// Quotation header with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuotationDetail {
    pub quotation: Quotation,
    pub lines: Vec<QuotationLine>,
}

/// Header fields of a quotation create or update, defaults not yet applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotationInput {
    pub client: Option<String>,
    pub payment_method: Option<String>,
    pub lines: Vec<LineRequest>,
}

impl QuotationInput {
    /// Client name with the placeholder applied to blank input.
    pub fn client_or_default(&self) -> String {
        non_blank(self.client.as_deref())
            .unwrap_or(crate::DEFAULT_QUOTATION_CLIENT)
            .to_string()
    }

    /// Payment method with the default applied to blank input.
    pub fn payment_method_or_default(&self) -> String {
        non_blank(self.payment_method.as_deref())
            .unwrap_or(crate::DEFAULT_QUOTATION_PAYMENT_METHOD)
            .to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, min_stock: i64) -> Product {
        Product {
            id: 1,
            code: "TOR-001".to_string(),
            barcode: None,
            description: "Tornillo 1/4".to_string(),
            location: None,
            stock,
            min_stock,
            max_stock: 100,
            purchase_price: Money::from_cents(150),
            sale_price: Money::from_cents(300),
            category_id: None,
            supplier_id: None,
            is_active: true,
            image: None,
        }
    }

    #[test]
    fn test_can_fulfil() {
        let p = product(5, 1);
        assert!(p.can_fulfil(5));
        assert!(!p.can_fulfil(6));
    }

    #[test]
    fn test_low_stock() {
        assert!(product(2, 2).is_low_stock());
        assert!(!product(3, 2).is_low_stock());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ProductPatch::default().is_empty());

        let patch = ProductPatch {
            barcode: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_receipt_entry_into_delta() {
        let entry = ReceiptEntry::new(4, 10).with_prices(None, Some(Money::from_cents(2500)));
        let delta = StockDelta::from(entry);
        assert_eq!(delta.delta, 10);
        assert_eq!(delta.purchase_price, None);
        assert_eq!(delta.sale_price, Some(Money::from_cents(2500)));

        assert_eq!(StockDelta::decrement(4, 3).delta, -3);
    }

    #[test]
    fn test_quotation_defaults() {
        let input = QuotationInput {
            client: Some("   ".to_string()),
            payment_method: None,
            lines: vec![],
        };
        assert_eq!(input.client_or_default(), "Público General");
        assert_eq!(input.payment_method_or_default(), "Efectivo");

        let input = QuotationInput {
            client: Some(" Ferretería Luna ".to_string()),
            payment_method: Some("Tarjeta".to_string()),
            lines: vec![],
        };
        assert_eq!(input.client_or_default(), "Ferretería Luna");
        assert_eq!(input.payment_method_or_default(), "Tarjeta");
    }

    #[test]
    fn test_quotation_status_default() {
        assert_eq!(QuotationStatus::default(), QuotationStatus::Pending);
        assert_eq!(
            serde_json::to_string(&QuotationStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
