//! # Inventory Commands

use tracing::{debug, info};

use crate::dto::{ReceiptRequest, ReceiptResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Applies an inventory receipt.
///
/// Prices are rounded and every entry is checked before the transaction
/// opens; the whole batch is committed or none of it is.
pub async fn apply_receipt(state: &AppState, request: ReceiptRequest) -> Result<ReceiptResponse, ApiError> {
    debug!(entries = request.entries.len(), "apply_receipt command");

    let entries = request.entries()?;
    let updated = tlapa_db::transaction::receipt::apply_receipt(state.db(), &entries).await?;

    info!(updated = updated.len(), "Inventory receipt applied");
    Ok(ReceiptResponse::new(updated))
}
