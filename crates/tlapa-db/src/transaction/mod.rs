//! # Ledger Transactions
//!
//! The three money-moving operations. Each one is a single database
//! transaction opened from the [`Database`](crate::Database) handle.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  validate (pure) ──► BEGIN ──► read ──► plan (pure) ──► write ──► COMMIT│
//! │       │                 │                   │              │            │
//! │       ▼                 └───────────────────┴──────────────┘            │
//! │  Validation                    any Err: the Transaction is dropped      │
//! │  (no DB call)                  → sqlx issues ROLLBACK                   │
//! │                                                                         │
//! │  sale       lock_and_fetch ─► plan_sale ─► header, lines, -stock       │
//! │  receipt    ─────────────────────────────► +stock (+prices), verify    │
//! │  quotation  fetch_active (no lock) ─► price ─► header, lines           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A dropped future (timeout, disconnect) drops the `Transaction` with it,
//! which also rolls back and releases every row lock.

pub mod quotation;
pub mod receipt;
pub mod sale;

use tracing::{error, warn};

use crate::error::DbError;
use tlapa_core::ErrorKind;

/// Logs a failed orchestration at a level matching its kind.
pub(crate) fn log_rejection(operation: &'static str, err: &DbError) {
    match err.kind() {
        ErrorKind::Internal => error!(operation, error = %err, "Transaction failed"),
        kind => warn!(operation, ?kind, error = %err, "Transaction rejected"),
    }
}
