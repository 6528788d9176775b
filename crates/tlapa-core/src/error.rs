//! # Error Types
//!
//! Domain-specific error types for tlapa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tlapa-core errors (this file)                                         │
//! │  ├── ErrorKind        - Validation / NotFound / Conflict / Internal    │
//! │  ├── CoreError        - Domain outcomes of a ledger operation          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tlapa-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures + wrapped CoreError           │
//! │                                                                         │
//! │  tlapa-api errors                                                      │
//! │  └── ApiError         - What the caller sees (code + message + status) │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error at every layer answers [`ErrorKind`] through a `kind()`
//! method; that is the only thing the boundary needs to pick a status.

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// The four outcomes a failed ledger operation can have.
///
/// ```text
/// Validation  → 400  malformed input, nothing was touched
/// NotFound    → 404  product/quotation/sale id missing (or inactive)
/// Conflict    → 409  insufficient stock, inactive product, duplicate key
/// Internal    → 500  storage failure, detail only in the server log
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    /// HTTP-equivalent status code for this kind.
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These are the *expected* failures of a sale, receipt or quotation. Each
/// variant carries enough context for the caller to act on it (which ids
/// were missing, how much stock is left).
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more requested products do not exist.
    ///
    /// ## When This Occurs
    /// - The locked row count differs from the distinct id count
    /// - A quotation references an unknown (or inactive) product
    #[error("Product(s) not found: {ids:?}")]
    ProductsNotFound { ids: Vec<i64> },

    /// A single product lookup failed.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// A receipt touched fewer rows than it named.
    ///
    /// The whole batch is rolled back; no partial receipt is ever committed.
    #[error("One or more products missing or inactive ({requested} requested, {updated} updated)")]
    ProductsMissingOrInactive { requested: usize, updated: usize },

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// Quotation not found.
    #[error("Quotation not found: {0}")]
    QuotationNotFound(i64),

    /// A product in a sale has been deactivated.
    #[error("Product \"{description}\" is inactive")]
    ProductInactive { product_id: i64, description: String },

    /// Insufficient stock to complete sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale request (qty: 5)
    ///      │
    ///      ▼
    /// Locked stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Caller shows: "Insufficient stock for Martillo: available 3"
    /// ```
    #[error("Insufficient stock for \"{description}\": available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        description: String,
        available: i64,
        requested: i64,
    },

    /// A unique business key is already taken.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies this error into the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::ProductsNotFound { .. }
            | CoreError::ProductNotFound(_)
            | CoreError::ProductsMissingOrInactive { .. }
            | CoreError::SaleNotFound(_)
            | CoreError::QuotationNotFound(_) => ErrorKind::NotFound,
            CoreError::ProductInactive { .. }
            | CoreError::InsufficientStock { .. }
            | CoreError::Duplicate { .. } => ErrorKind::Conflict,
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        CoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request input doesn't meet requirements.
/// They are raised before any transaction is opened.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A list that must carry at least one element is empty.
    #[error("{field} must contain at least one item")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., more than two decimals after rounding overflow).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A line item inside a list failed validation.
    #[error("item {index} (product {product_id}): {source}")]
    Item {
        index: usize,
        product_id: i64,
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn must_be_positive(field: &str) -> Self {
        ValidationError::MustBePositive {
            field: field.to_string(),
        }
    }

    pub(crate) fn negative(field: &str) -> Self {
        ValidationError::Negative {
            field: field.to_string(),
        }
    }

    /// Wraps this error with the position of the offending line item.
    pub fn at_item(self, index: usize, product_id: i64) -> Self {
        ValidationError::Item {
            index,
            product_id,
            source: Box::new(self),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
