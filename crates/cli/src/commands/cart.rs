//! Cart commands.
//!
//! Every command restores (or creates) the session cart first, performs its
//! action through the cart store and prints the resulting snapshot.

use medusa_storefront::AppState;
use medusa_storefront_core::{LineItemId, Quantity, VariantId};
use thiserror::Error;

use crate::output;

/// Errors surfaced by cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The store recorded a failure; the message is the underlying error.
    #[error("Cart action failed: {0}")]
    Failed(String),

    #[error("Quantity must be at least 1")]
    InvalidQuantity,
}

/// Print the snapshot and turn a recorded failure into an error.
fn finish(state: &AppState) -> Result<(), CartCommandError> {
    let snapshot = state.cart().snapshot();
    output::print_cart(&snapshot, state.config().currency);

    match snapshot.error {
        Some(message) => Err(CartCommandError::Failed(message)),
        None => Ok(()),
    }
}

pub async fn show(state: &AppState) -> Result<(), CartCommandError> {
    state.cart().initialize().await;
    finish(state)
}

pub async fn add(state: &AppState, variant_id: &str, quantity: u32) -> Result<(), CartCommandError> {
    let quantity = Quantity::new(quantity).ok_or(CartCommandError::InvalidQuantity)?;

    let cart = state.cart();
    cart.initialize().await;
    cart.add_item(&VariantId::new(variant_id), quantity).await;
    finish(state)
}

pub async fn update(
    state: &AppState,
    line_item_id: &str,
    quantity: u32,
) -> Result<(), CartCommandError> {
    let cart = state.cart();
    cart.initialize().await;
    cart.set_item_quantity(&LineItemId::new(line_item_id), quantity)
        .await;
    finish(state)
}

pub async fn remove(state: &AppState, line_item_id: &str) -> Result<(), CartCommandError> {
    let cart = state.cart();
    cart.initialize().await;
    cart.remove_item(&LineItemId::new(line_item_id)).await;
    finish(state)
}

/// Forget the stored cart without contacting the backend.
pub async fn clear(state: &AppState) {
    state.cart().clear().await;
    output::print_line("Cart cleared");
}
