//! # tlapa-api
//!
//! The boundary between the wire format and the Tlapa POS ledger.
//!
//! ## Module Organization
//! ```text
//! tlapa_api/
//! ├── lib.rs          ◄─── You are here (tracing setup, re-exports)
//! ├── config.rs       ◄─── Environment configuration
//! ├── state.rs        ◄─── AppState (database handle)
//! ├── dto.rs          ◄─── Request/response bodies
//! ├── error.rs        ◄─── ApiError {code, message} + status
//! └── commands/
//!     ├── sale.rs       ◄─── create_sale, list_sales, get_sale
//!     ├── inventory.rs  ◄─── apply_receipt
//!     ├── quotation.rs  ◄─── quotation create/update/delete/get/list
//!     └── product.rs    ◄─── catalog CRUD, low stock
//! ```
//!
//! ## Startup Sequence
//! ```rust,ignore
//! tlapa_api::init_tracing();
//! let config = AppConfig::from_env()?;
//! let state = AppState::connect(&config).await?;
//!
//! let response = commands::create_sale(&state, user_id, request).await;
//! ```

pub mod commands;
pub mod config;
pub mod dto;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ErrorBody, ErrorCode};
pub use state::AppState;

const DEFAULT_LOG_FILTER: &str = "info,tlapa=debug,sqlx=warn";

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - Default: `info` everywhere, `debug` for the tlapa crates, `warn` for sqlx
/// - Override with the `RUST_LOG` environment variable
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
