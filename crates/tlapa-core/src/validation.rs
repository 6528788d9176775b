//! # Validation Module
//!
//! Input validation for Tlapa POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request boundary (tlapa-api)                                 │
//! │  ├── Deserialization (types, required keys)                            │
//! │  └── Decimal prices → Money via parse_price                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field rules (non-empty, positive, non-negative)                   │
//! │  └── Runs before any transaction is opened                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (PostgreSQL)                                        │
//! │  ├── CHECK (stock >= 0)                                                │
//! │  ├── UNIQUE (code), UNIQUE (barcode)                                   │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names in errors are the wire names the caller sent (`formaPago`,
//! `cantidad`, ...) so a message can be shown next to the offending input.
//!
//! ## Usage
//! ```rust
//! use tlapa_core::validation::{validate_payment_method, validate_quantity};
//!
//! assert_eq!(validate_payment_method("  Efectivo ").unwrap(), "Efectivo");
//! assert!(validate_quantity(0).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineRequest, NewProduct, ProductPatch, ReceiptEntry};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_CODE_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 200;
const MAX_PAYMENT_METHOD_LEN: usize = 50;

/// Largest amount a `NUMERIC(12,2)` column holds: 999,999,999.99.
pub const MAX_AMOUNT: Money = Money::from_cents(99_999_999_999);

// =============================================================================
// String Validators
// =============================================================================

/// Validates a payment method and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 50 characters
pub fn validate_payment_method(method: &str) -> ValidationResult<String> {
    let method = method.trim();

    if method.is_empty() {
        return Err(ValidationError::required("formaPago"));
    }

    if method.chars().count() > MAX_PAYMENT_METHOD_LEN {
        return Err(ValidationError::TooLong {
            field: "formaPago".to_string(),
            max: MAX_PAYMENT_METHOD_LEN,
        });
    }

    Ok(method.to_string())
}

/// Validates a product code.
///
/// ## Example
/// ```rust
/// use tlapa_core::validation::validate_code;
///
/// assert!(validate_code("TOR-001").is_ok());
/// assert!(validate_code("").is_err());
/// assert!(validate_code("A".repeat(51).as_str()).is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<()> {
    validate_text("codigo", code, MAX_CODE_LEN)
}

/// Validates a product description.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    validate_text("descripcion", description, MAX_DESCRIPTION_LEN)
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product id (must be > 0).
pub fn validate_product_id(id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::must_be_positive("id"));
    }
    Ok(())
}

/// Validates a line quantity (must be > 0).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("cantidad"));
    }
    Ok(())
}

/// Validates a stock level or threshold (must be >= 0).
pub fn validate_stock_level(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::negative(field));
    }
    Ok(())
}

/// Validates a price already expressed in cents.
///
/// ## Rules
/// - Must not be negative
/// - At most [`MAX_AMOUNT`]
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::negative(field));
    }
    validate_amount(field, price)
}

/// Rejects an amount the money columns cannot store.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount > MAX_AMOUNT {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("amount exceeds maximum of {MAX_AMOUNT}"),
        });
    }
    Ok(())
}

/// Converts an external decimal price into cents.
///
/// Rounds half away from zero to two places, then rejects negatives.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tlapa_core::validation::parse_price;
///
/// let price = parse_price("precioVenta", Decimal::new(12345, 3)).unwrap(); // 12.345
/// assert_eq!(price.cents(), 1235);
/// assert!(parse_price("precioVenta", Decimal::new(-1, 0)).is_err());
/// ```
pub fn parse_price(field: &str, amount: Decimal) -> ValidationResult<Money> {
    let price = Money::from_decimal(amount).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "amount out of range".to_string(),
    })?;
    validate_price(field, price)?;
    Ok(price)
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates the lines of a quotation.
///
/// Quantities are not checked here: quotation lines are clamped to at
/// least one unit when priced.
pub fn validate_quotation_lines(lines: &[LineRequest]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Empty {
            field: "productos".to_string(),
        });
    }

    for (index, line) in lines.iter().enumerate() {
        validate_product_id(line.product_id).map_err(|e| e.at_item(index, line.product_id))?;
    }

    Ok(())
}

/// Validates one receipt entry.
pub fn validate_receipt_entry(entry: &ReceiptEntry) -> ValidationResult<()> {
    validate_product_id(entry.product_id)?;
    validate_quantity(entry.quantity)?;
    if let Some(price) = entry.purchase_price {
        validate_price("precioCompra", price)?;
    }
    if let Some(price) = entry.sale_price {
        validate_price("precioVenta", price)?;
    }
    Ok(())
}

/// Validates a receipt batch. The first violating entry wins.
///
/// ## Flow
/// ```text
/// entradas: [ok, ok, bad qty, bad id]
///                     │
///                     ▼
///        Err(item 2 (product N): cantidad must be positive)
/// ```
pub fn validate_receipt_entries(entries: &[ReceiptEntry]) -> ValidationResult<()> {
    if entries.is_empty() {
        return Err(ValidationError::Empty {
            field: "entradas".to_string(),
        });
    }

    for (index, entry) in entries.iter().enumerate() {
        validate_receipt_entry(entry).map_err(|e| e.at_item(index, entry.product_id))?;
    }

    Ok(())
}

/// Validates a new catalog entry.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_code(&product.code)?;
    validate_description(&product.description)?;
    validate_stock_level("cantidadStock", product.stock)?;
    validate_stock_level("stockMinimo", product.min_stock)?;
    validate_stock_level("stockMaximo", product.max_stock)?;
    validate_price("precioCompra", product.purchase_price)?;
    validate_price("precioVenta", product.sale_price)?;
    Ok(())
}

/// Validates the supplied fields of a product edit.
pub fn validate_patch(patch: &ProductPatch) -> ValidationResult<()> {
    if let Some(code) = &patch.code {
        validate_code(code)?;
    }
    if let Some(description) = &patch.description {
        validate_description(description)?;
    }
    if let Some(stock) = patch.stock {
        validate_stock_level("cantidadStock", stock)?;
    }
    if let Some(min) = patch.min_stock {
        validate_stock_level("stockMinimo", min)?;
    }
    if let Some(max) = patch.max_stock {
        validate_stock_level("stockMaximo", max)?;
    }
    if let Some(price) = patch.purchase_price {
        validate_price("precioCompra", price)?;
    }
    if let Some(price) = patch.sale_price {
        validate_price("precioVenta", price)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
