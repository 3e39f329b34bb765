//! Catalog commands.

use medusa_storefront::{AppError, AppState};
use medusa_storefront_core::ProductId;

use crate::output;

/// Print one page of products.
pub async fn list(state: &AppState, limit: u32, offset: u32) -> Result<(), AppError> {
    let page = state.products(limit, offset).await?;
    output::print_products(&page, offset, state.config().currency);
    Ok(())
}

/// Print a product with its variants and active prices.
pub async fn show(state: &AppState, id: &str) -> Result<(), AppError> {
    match state.product(&ProductId::new(id)).await {
        Ok(product) => {
            output::print_product(&product, state.config().currency);
            Ok(())
        }
        Err(e @ AppError::NotFound(_)) => {
            output::print_line("product not found");
            Err(e)
        }
        Err(e) => Err(e),
    }
}
