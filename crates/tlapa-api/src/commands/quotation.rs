//! # Quotation Commands
//!
//! Quotations snapshot prices and descriptions when written and never touch
//! stock.

use tracing::debug;

use crate::dto::{QuotationCreated, QuotationDetailDto, QuotationDto, QuotationRequest, QuotationUpdated};
use crate::error::ApiError;
use crate::state::AppState;
use tlapa_core::QUOTATION_LIST_LIMIT;
use tlapa_db::transaction::quotation;

pub async fn create_quotation(
    state: &AppState,
    user_id: i64,
    request: QuotationRequest,
) -> Result<QuotationCreated, ApiError> {
    debug!(user_id, lines = request.items.len(), "create_quotation command");

    let totals = quotation::create_quotation(state.db(), user_id, &request.to_input()).await?;
    Ok(QuotationCreated::from(totals))
}

/// Replaces header and lines of quotation `id`.
pub async fn update_quotation(
    state: &AppState,
    id: i64,
    request: QuotationRequest,
) -> Result<QuotationUpdated, ApiError> {
    debug!(id, lines = request.items.len(), "update_quotation command");

    let totals = quotation::update_quotation(state.db(), id, &request.to_input()).await?;
    Ok(QuotationUpdated::from(totals))
}

pub async fn delete_quotation(state: &AppState, id: i64) -> Result<(), ApiError> {
    debug!(id, "delete_quotation command");

    quotation::delete_quotation(state.db(), id).await?;
    Ok(())
}

pub async fn get_quotation(state: &AppState, id: i64) -> Result<QuotationDetailDto, ApiError> {
    debug!(id, "get_quotation command");

    let detail = state
        .db()
        .quotations()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Quotation", id))?;

    Ok(QuotationDetailDto::from(detail))
}

/// The most recent quotations.
pub async fn list_quotations(state: &AppState) -> Result<Vec<QuotationDto>, ApiError> {
    let quotations = state.db().quotations().list(QUOTATION_LIST_LIMIT).await?;
    Ok(quotations.into_iter().map(QuotationDto::from).collect())
}
