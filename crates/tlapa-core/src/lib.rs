//! # tlapa-core: Pure Business Logic for Tlapa POS
//!
//! This crate is the **heart** of the stock-and-money ledger. Everything that
//! decides *whether* a sale, receipt or quotation is valid, and *what* it
//! will write, lives here as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tlapa POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 tlapa-api (request boundary)                    │   │
//! │  │     SaleRequest ──► commands::sale ──► SaleResponse             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tlapa-db (transactions)                         │   │
//! │  │     BEGIN ─► lock ─► plan ─► write ─► COMMIT / ROLLBACK         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ calls                                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tlapa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │ aggregate │  │  pricing  │  │ validation│  │   │
//! │  │   │   Money   │  │  Demand   │  │ SalePlan  │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Quotation, receipt entries)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Error taxonomy shared by every layer
//! - [`validation`] - Field-level input validation
//! - [`aggregate`] - Line-item aggregation (one demand per product)
//! - [`pricing`] - Line pricing, totals and sale planning
//!
//! ## Example Usage
//!
//! ```rust
//! use tlapa_core::aggregate::aggregate_line_items;
//! use tlapa_core::LineRequest;
//!
//! let demand = aggregate_line_items(&[
//!     LineRequest::new(7, 2),
//!     LineRequest::new(3, 1),
//!     LineRequest::new(7, 3),
//! ])
//! .unwrap();
//!
//! // Product 7 is one locking target with a combined demand of 5
//! assert_eq!(demand.quantity_of(7), Some(5));
//! assert_eq!(demand.ids(), vec![3, 7]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Client name stored on a quotation when the request leaves it blank.
pub const DEFAULT_QUOTATION_CLIENT: &str = "Público General";

/// Payment method stored on a quotation when the request leaves it blank.
pub const DEFAULT_QUOTATION_PAYMENT_METHOD: &str = "Efectivo";

/// Maximum number of quotations returned by a listing.
pub const QUOTATION_LIST_LIMIT: i64 = 100;
