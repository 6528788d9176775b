//! # Product Commands
//!
//! Catalog maintenance. Stock moves through sales and receipts; the
//! `cantidadStock` field here is for corrections.

use std::time::Instant;

use tracing::{debug, info};

use crate::commands::clamp_limit;
use crate::dto::{NewProductRequest, ProductDto, ProductUpdateRequest};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_product(state: &AppState, request: NewProductRequest) -> Result<ProductDto, ApiError> {
    debug!(code = %request.code, "create_product command");

    let product = state.db().products().insert(&request.to_new_product()?).await?;

    info!(id = product.id, code = %product.code, "Product created");
    Ok(ProductDto::from(product))
}

/// Writes only the fields present in the request.
pub async fn update_product(
    state: &AppState,
    id: i64,
    request: ProductUpdateRequest,
) -> Result<ProductDto, ApiError> {
    debug!(id, "update_product command");

    let product = state.db().products().update(id, &request.to_patch()?).await?;

    info!(id, "Product updated");
    Ok(ProductDto::from(product))
}

/// Soft delete: the product stays in sale history but can no longer be
/// sold, quoted or received.
pub async fn deactivate_product(state: &AppState, id: i64) -> Result<(), ApiError> {
    debug!(id, "deactivate_product command");

    state.db().products().deactivate(id).await?;

    info!(id, "Product deactivated");
    Ok(())
}

pub async fn get_product(state: &AppState, id: i64) -> Result<ProductDto, ApiError> {
    debug!(id, "get_product command");

    let product = state
        .db()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    Ok(ProductDto::from(product))
}

/// Active products ordered by description.
pub async fn list_products(state: &AppState, limit: Option<u32>) -> Result<Vec<ProductDto>, ApiError> {
    let start = Instant::now();
    let limit = clamp_limit(limit, 100, 1_000);

    let products = state.db().products().list_active(limit).await?;

    debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = products.len(),
        "list_products complete"
    );
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Active products at or below their minimum stock.
pub async fn list_low_stock(state: &AppState) -> Result<Vec<ProductDto>, ApiError> {
    let products = state.db().products().list_low_stock().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}
