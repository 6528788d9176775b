//! # Application State
//!
//! Everything a command needs to serve a request. The `Database` inside is a
//! pool handle; cloning the state is cheap and every clone shares the pool.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn get_product(state: &AppState, id: i64) -> Result<ProductDto, ApiError> {
//!     let product = state.db().products().get_by_id(id).await?;
//!     ...
//! }
//! ```

use tracing::info;

use crate::config::AppConfig;
use tlapa_db::{Database, DbResult};

/// Shared state handed to every command.
#[derive(Debug, Clone)]
pub struct AppState {
    db: Database,
}

impl AppState {
    /// Wraps an existing database handle.
    pub fn new(db: Database) -> Self {
        AppState { db }
    }

    /// Connects the pool (and runs migrations when configured).
    pub async fn connect(config: &AppConfig) -> DbResult<Self> {
        info!(database = %config.redacted_url(), "Connecting to database");
        let db = Database::new(config.db_config()).await?;
        Ok(AppState::new(db))
    }

    /// Returns the database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }
}
