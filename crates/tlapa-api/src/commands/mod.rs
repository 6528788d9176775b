//! # Commands
//!
//! Every operation exposed to the client, independent of the transport that
//! carries it.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── sale.rs       ◄─── Sale recording and history
//! ├── inventory.rs  ◄─── Inventory receipts
//! ├── quotation.rs  ◄─── Quotation create/replace/delete and reads
//! └── product.rs    ◄─── Catalog CRUD and low-stock listing
//! ```
//!
//! ## How Commands Work
//! ```text
//! transport (HTTP handler, IPC, test)
//!      │  decoded DTO + authenticated user id
//!      ▼
//! pub async fn create_sale(
//!     state: &AppState,
//!     user_id: i64,
//!     request: SaleRequest,
//! ) -> Result<SaleResponse, ApiError>
//!      │
//!      ▼
//! Ok  → serialize the DTO
//! Err → ApiError::status() + ApiError::body()
//! ```

pub mod inventory;
pub mod product;
pub mod quotation;
pub mod sale;

pub use inventory::apply_receipt;
pub use product::{create_product, deactivate_product, get_product, list_low_stock, list_products, update_product};
pub use quotation::{create_quotation, delete_quotation, get_quotation, list_quotations, update_quotation};
pub use sale::{create_sale, get_sale, list_sales};

/// Default and ceiling for history and catalog listings.
pub(crate) fn clamp_limit(limit: Option<u32>, default: u32, max: u32) -> i64 {
    i64::from(limit.unwrap_or(default).clamp(1, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 100, 500), 100);
        assert_eq!(clamp_limit(Some(0), 100, 500), 1);
        assert_eq!(clamp_limit(Some(20), 100, 500), 20);
        assert_eq!(clamp_limit(Some(10_000), 100, 500), 500);
    }
}
