//! Cart state and the transitions that change it.

use medusa_storefront_core::{Cart, minor_to_major};
use rust_decimal::Decimal;

/// Everything the presentation layer needs to render the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    /// Latest snapshot returned by the backend.
    pub cart: Option<Cart>,
    /// An operation is in flight.
    pub loading: bool,
    /// Message of the last failure, cleared by the next successful snapshot.
    pub error: Option<String>,
    /// Whether the cart sidebar is open.
    pub sidebar_open: bool,
}

/// A state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Replace the snapshot after a successful backend call.
    SetCart(Cart),
    SetLoading(bool),
    /// Record a failure; the snapshot is kept.
    SetError(String),
    /// Drop the snapshot.
    ClearCart,
    SetSidebar(bool),
}

impl CartState {
    /// Apply one transition.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::SetCart(cart) => {
                self.cart = Some(cart);
                self.loading = false;
                self.error = None;
            }
            CartAction::SetLoading(loading) => self.loading = loading,
            CartAction::SetError(message) => {
                self.error = Some(message);
                self.loading = false;
            }
            CartAction::ClearCart => {
                self.cart = None;
                self.loading = false;
            }
            CartAction::SetSidebar(open) => self.sidebar_open = open,
        }
    }

    /// Sum of line quantities, 0 without a cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.as_ref().map_or(0, Cart::item_count)
    }

    /// Grand total in major units, 0 without a cart.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart
            .as_ref()
            .map_or_else(|| minor_to_major(0), Cart::total_major)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use medusa_storefront_core::CartId;

    use super::*;

    fn cart_with_total(total: i64) -> Cart {
        let mut cart = Cart::empty(CartId::new("cart_1"));
        cart.subtotal = total;
        cart.total = total;
        cart
    }

    #[test]
    fn test_default_state() {
        let state = CartState::default();
        assert!(state.cart.is_none());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(!state.sidebar_open);
        assert_eq!(state.item_count(), 0);
        assert_eq!(state.total(), Decimal::ZERO);
    }

    #[test]
    fn test_set_cart_clears_loading_and_error() {
        let mut state = CartState::default();
        state.apply(CartAction::SetLoading(true));
        state.apply(CartAction::SetError("boom".to_string()));
        state.apply(CartAction::SetLoading(true));

        state.apply(CartAction::SetCart(cart_with_total(55_800)));

        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.total(), Decimal::new(558, 0));
    }

    #[test]
    fn test_set_error_keeps_cart() {
        let mut state = CartState::default();
        state.apply(CartAction::SetCart(cart_with_total(100)));
        state.apply(CartAction::SetLoading(true));

        state.apply(CartAction::SetError("API error (500): down".to_string()));

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("API error (500): down"));
        assert_eq!(state.cart.unwrap().total, 100);
    }

    #[test]
    fn test_clear_cart_is_idempotent() {
        let mut state = CartState::default();
        state.apply(CartAction::SetCart(cart_with_total(100)));

        state.apply(CartAction::ClearCart);
        let once = state.clone();
        state.apply(CartAction::ClearCart);

        assert_eq!(state, once);
        assert!(state.cart.is_none());
    }

    #[test]
    fn test_sidebar_is_independent_of_cart() {
        let mut state = CartState::default();
        state.apply(CartAction::SetSidebar(true));
        state.apply(CartAction::ClearCart);
        assert!(state.sidebar_open);

        state.apply(CartAction::SetSidebar(false));
        assert!(!state.sidebar_open);
    }
}
