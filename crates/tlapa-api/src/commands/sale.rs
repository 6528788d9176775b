//! # Sale Commands

use tracing::debug;

use crate::commands::clamp_limit;
use crate::dto::{SaleDetailDto, SaleRequest, SaleResponse, SaleSummaryDto};
use crate::error::ApiError;
use crate::state::AppState;
use tlapa_db::transaction::sale::record_sale;

/// Records a sale for the authenticated cashier.
///
/// ## Flow
/// ```text
/// {formaPago, productos} ──► record_sale (one transaction) ──► {ok, ventaId, total, ...}
/// ```
pub async fn create_sale(state: &AppState, user_id: i64, request: SaleRequest) -> Result<SaleResponse, ApiError> {
    debug!(user_id, lines = request.items.len(), "create_sale command");

    let receipt = record_sale(state.db(), user_id, &request.payment_method, &request.lines()).await?;
    Ok(SaleResponse::from(receipt))
}

/// Sales history, newest first, with the seller's name.
pub async fn list_sales(state: &AppState, limit: Option<u32>) -> Result<Vec<SaleSummaryDto>, ApiError> {
    let limit = clamp_limit(limit, 100, 1_000);
    debug!(limit, "list_sales command");

    let sales = state.db().sales().list(limit).await?;
    Ok(sales.into_iter().map(SaleSummaryDto::from).collect())
}

/// One sale with its lines.
pub async fn get_sale(state: &AppState, id: i64) -> Result<SaleDetailDto, ApiError> {
    debug!(id, "get_sale command");

    let detail = state
        .db()
        .sales()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", id))?;

    Ok(SaleDetailDto::from(detail))
}
