//! # tlapa-db: Ledger Persistence for Tlapa POS
//!
//! This crate provides database access for the Tlapa POS ledger.
//! It uses PostgreSQL through sqlx; every money-moving operation is one
//! database transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tlapa POS Data Flow                              │
//! │                                                                         │
//! │  tlapa-api command (create_sale)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tlapa-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  transaction  │    │  repository   │    │  migrations  │  │   │
//! │  │   │               │    │               │    │  (embedded)  │  │   │
//! │  │   │ record_sale   │───►│ Product (lock,│    │ 0001_initial │  │   │
//! │  │   │ apply_receipt │    │  bulk delta)  │    │   _schema    │  │   │
//! │  │   │ quotations    │    │ Sale, Quote   │    │              │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │ pure planning                                       │   │
//! │  │           ▼                                                     │   │
//! │  │       tlapa-core                                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     PostgreSQL                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repositories (product ledger, sales, quotations)
//! - [`transaction`] - Sale, receipt and quotation transactions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tlapa_core::LineRequest;
//! use tlapa_db::{transaction, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("postgres://localhost/tlapa")).await?;
//!
//! let receipt = transaction::sale::record_sale(
//!     &db,
//!     cashier_id,
//!     "Efectivo",
//!     &[LineRequest::new(7, 2), LineRequest::new(7, 3)],
//! )
//! .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod transaction;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::{DeltaScope, ProductRepository};
pub use repository::quotation::QuotationRepository;
pub use repository::sale::SaleRepository;
pub use transaction::quotation::QuotationTotals;
