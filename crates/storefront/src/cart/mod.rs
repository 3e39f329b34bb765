//! Client-side cart store.
//!
//! Owns the cart snapshot for one shopper session and mirrors it into a
//! `tokio::sync::watch` channel so the presentation layer can re-render on
//! every transition.
//!
//! # Sequencing
//!
//! Mutations go through a single-flight lane (a FIFO `tokio::sync::Mutex`).
//! A mutation is only sent once the previous one has settled, so the final
//! snapshot always reflects the last *submitted* mutation. The "no active
//! cart" check runs when an operation reaches the head of the lane.
//!
//! # Failures
//!
//! Gateway failures never leave the store. They are logged, recorded in
//! [`CartState::error`] and reported to the shopper through the [`Notifier`]
//! with a generic message; the previous snapshot is kept.

mod notify;
mod state;
mod storage;

use std::sync::Arc;

use medusa_storefront_core::{Cart, CartId, LineItemId, Quantity, VariantId};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::commerce::{CommerceGateway, GatewayError, Routed};

pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use state::{CartAction, CartState};
pub use storage::{CartIdStorage, FileCartIdStorage, MemoryCartIdStorage, StorageError};

const ADDED: &str = "Product added to cart";
const UPDATED: &str = "Quantity updated";
const REMOVED: &str = "Product removed";
const CLEARED: &str = "Cart cleared";

const CREATE_FAILED: &str = "Could not create the cart";
const ADD_FAILED: &str = "Could not add the product";
const UPDATE_FAILED: &str = "Could not update the quantity";
const REMOVE_FAILED: &str = "Could not remove the product";

/// Cart state holder for one shopper session.
pub struct CartStore {
    gateway: CommerceGateway,
    storage: Arc<dyn CartIdStorage>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<CartState>,
    lane: Mutex<()>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("gateway", &self.gateway)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    #[must_use]
    pub fn new(
        gateway: CommerceGateway,
        storage: Arc<dyn CartIdStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self {
            gateway,
            storage,
            notifier,
            state,
            lane: Mutex::new(()),
        }
    }

    // =========================================================================
    // State Access
    // =========================================================================

    /// Clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Sum of line quantities in the current snapshot.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.borrow().item_count()
    }

    /// Grand total of the current snapshot in major units.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.state.borrow().total()
    }

    pub fn open_sidebar(&self) {
        self.toggle_sidebar(true);
    }

    pub fn close_sidebar(&self) {
        self.toggle_sidebar(false);
    }

    pub fn toggle_sidebar(&self, open: bool) {
        self.dispatch(CartAction::SetSidebar(open));
    }

    fn dispatch(&self, action: CartAction) {
        self.state.send_modify(|state| state.apply(action));
    }

    fn active_cart_id(&self) -> Option<CartId> {
        self.state.borrow().cart.as_ref().map(|cart| cart.id.clone())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Restore the stored cart, or start a new one.
    ///
    /// A stored id the backend cannot return is replaced by a new cart.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        let _lane = self.lane.lock().await;
        self.dispatch(CartAction::SetLoading(true));

        let stored = match self.storage.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Could not read stored cart id");
                None
            }
        };

        if let Some(cart_id) = stored {
            match self.gateway.get_cart(&cart_id).await {
                Ok(routed) => {
                    debug!(cart_id = %cart_id, fallback = routed.is_fallback(), "Restored stored cart");
                    self.accept(routed);
                    return;
                }
                Err(e) => {
                    info!(cart_id = %cart_id, error = %e, "Stored cart unavailable, creating a new one");
                }
            }
        }

        self.create_in_lane().await;
    }

    /// Start a new empty cart and make it the active one.
    #[instrument(skip(self))]
    pub async fn create_new(&self) {
        let _lane = self.lane.lock().await;
        self.create_in_lane().await;
    }

    async fn create_in_lane(&self) {
        self.dispatch(CartAction::SetLoading(true));

        match self.gateway.create_cart().await {
            Ok(Routed::Primary(cart)) => {
                self.persist(&cart.id);
                self.dispatch(CartAction::SetCart(cart));
            }
            Ok(routed @ Routed::Fallback { .. }) => self.accept(routed),
            Err(e) => self.fail(CREATE_FAILED, &e),
        }
    }

    /// Forget the active cart locally. The backend is not told.
    #[instrument(skip(self))]
    pub async fn clear(&self) {
        let _lane = self.lane.lock().await;

        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Could not clear stored cart id");
        }
        self.dispatch(CartAction::ClearCart);
        self.notifier.notify(Notification::success(CLEARED, 2000));
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` of a variant to the active cart.
    #[instrument(skip(self), fields(variant_id = %variant_id))]
    pub async fn add_item(&self, variant_id: &VariantId, quantity: Quantity) {
        let _lane = self.lane.lock().await;
        let Some(cart_id) = self.active_cart_id() else {
            debug!("No active cart, ignoring add");
            return;
        };

        self.dispatch(CartAction::SetLoading(true));
        let result = self
            .gateway
            .add_line_item(&cart_id, variant_id, quantity)
            .await;
        self.settle(result, Notification::success(ADDED, 2000), ADD_FAILED);
    }

    /// Set the quantity of a line in the active cart.
    #[instrument(skip(self), fields(line_item_id = %line_item_id))]
    pub async fn update_item_quantity(&self, line_item_id: &LineItemId, quantity: Quantity) {
        let _lane = self.lane.lock().await;
        let Some(cart_id) = self.active_cart_id() else {
            debug!("No active cart, ignoring update");
            return;
        };

        self.dispatch(CartAction::SetLoading(true));
        let result = self
            .gateway
            .update_line_item(&cart_id, line_item_id, quantity)
            .await;
        self.settle(result, Notification::success(UPDATED, 1500), UPDATE_FAILED);
    }

    /// Set a raw quantity from user input; `0` removes the line.
    pub async fn set_item_quantity(&self, line_item_id: &LineItemId, quantity: u32) {
        match Quantity::new(quantity) {
            Some(quantity) => self.update_item_quantity(line_item_id, quantity).await,
            None => self.remove_item(line_item_id).await,
        }
    }

    /// Remove a line from the active cart.
    #[instrument(skip(self), fields(line_item_id = %line_item_id))]
    pub async fn remove_item(&self, line_item_id: &LineItemId) {
        let _lane = self.lane.lock().await;
        let Some(cart_id) = self.active_cart_id() else {
            debug!("No active cart, ignoring remove");
            return;
        };

        self.dispatch(CartAction::SetLoading(true));
        let result = self
            .gateway
            .remove_line_item(&cart_id, line_item_id)
            .await;
        self.settle(result, Notification::success(REMOVED, 2000), REMOVE_FAILED);
    }

    // =========================================================================
    // Outcome Handling
    // =========================================================================

    fn settle(
        &self,
        result: Result<Routed<Cart>, GatewayError>,
        success: Notification,
        failure: &'static str,
    ) {
        match result {
            Ok(routed) => {
                self.accept(routed);
                self.notifier.notify(success);
            }
            Err(e) => self.fail(failure, &e),
        }
    }

    /// Replace the snapshot without touching storage.
    fn accept(&self, routed: Routed<Cart>) {
        let cart = match routed {
            Routed::Primary(cart) => cart,
            Routed::Fallback { value, cause } => {
                warn!(cart_id = %value.id, error = %cause, "Using simulator cart for this session");
                value
            }
        };
        self.dispatch(CartAction::SetCart(cart));
    }

    fn persist(&self, cart_id: &CartId) {
        if let Err(e) = self.storage.save(cart_id) {
            warn!(cart_id = %cart_id, error = %e, "Could not store cart id");
        }
    }

    fn fail(&self, notice: &'static str, e: &GatewayError) {
        error!(
            error = %e,
            primary_cause = ?e.primary_cause,
            "{notice}"
        );
        self.dispatch(CartAction::SetError(e.to_string()));
        self.notifier.notify(Notification::error(notice));
    }
}
