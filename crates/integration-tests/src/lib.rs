//! Integration tests for the Medusa storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p medusa-storefront-integration-tests
//! ```
//!
//! No network or backend is needed: remote failures are produced by stub
//! backends and the simulator runs without latency.
//!
//! # Test Categories
//!
//! - `cart_flow` - End-to-end cart sessions in mock mode
//! - `cart_ordering` - Sequencing of queued cart mutations
//! - `gateway_fallback` - Remote failures and the simulator fallback

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use medusa_storefront::cart::{CartIdStorage, CartStore, RecordingNotifier};
use medusa_storefront::commerce::{
    BackendKind, CommerceBackend, CommerceError, CommerceGateway, MockCommerce,
};
use medusa_storefront_core::{
    Cart, CartId, LineItemId, Product, ProductId, ProductPage, Quantity, VariantId,
};

// =============================================================================
// TestContext
// =============================================================================

/// A cart store wired to a gateway, with its storage and notifier exposed.
pub struct TestContext<S> {
    pub store: CartStore,
    pub storage: Arc<S>,
    pub notifier: Arc<RecordingNotifier>,
}

impl<S: CartIdStorage + 'static> TestContext<S> {
    #[must_use]
    pub fn new(gateway: CommerceGateway, storage: S) -> Self {
        let storage = Arc::new(storage);
        let notifier = Arc::new(RecordingNotifier::new());
        let store = CartStore::new(gateway, storage.clone(), notifier.clone());
        Self {
            store,
            storage,
            notifier,
        }
    }
}

/// Gateway over a latency-free simulator.
#[must_use]
pub fn mock_gateway() -> CommerceGateway {
    CommerceGateway::mock(MockCommerce::without_latency())
}

// =============================================================================
// UnreachableBackend
// =============================================================================

/// Remote stand-in whose every call fails as if the host were down.
#[derive(Debug, Default)]
pub struct UnreachableBackend {
    calls: AtomicUsize,
}

impl UnreachableBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, CommerceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CommerceError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        })
    }
}

#[async_trait]
impl CommerceBackend for UnreachableBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Medusa
    }

    async fn list_products(&self, _: u32, _: u32) -> Result<ProductPage, CommerceError> {
        self.fail()
    }

    async fn get_product(&self, _: &ProductId) -> Result<Product, CommerceError> {
        self.fail()
    }

    async fn create_cart(&self) -> Result<Cart, CommerceError> {
        self.fail()
    }

    async fn add_line_item(
        &self,
        _: &CartId,
        _: &VariantId,
        _: Quantity,
    ) -> Result<Cart, CommerceError> {
        self.fail()
    }

    async fn update_line_item(
        &self,
        _: &CartId,
        _: &LineItemId,
        _: Quantity,
    ) -> Result<Cart, CommerceError> {
        self.fail()
    }

    async fn remove_line_item(&self, _: &CartId, _: &LineItemId) -> Result<Cart, CommerceError> {
        self.fail()
    }

    async fn get_cart(&self, _: &CartId) -> Result<Cart, CommerceError> {
        self.fail()
    }
}

// =============================================================================
// DelayedBackend
// =============================================================================

/// Simulator wrapper that pauses each cart mutation for a scripted delay and
/// records the order in which mutations complete.
#[derive(Debug, Default)]
pub struct DelayedBackend {
    inner: MockCommerce,
    delays: Mutex<VecDeque<Duration>>,
    completed: Mutex<Vec<String>>,
}

impl DelayedBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: MockCommerce::without_latency(),
            ..Self::default()
        }
    }

    /// Delays for the next mutations, in call order. Unscripted calls answer
    /// immediately.
    pub fn push_delays(&self, delays: impl IntoIterator<Item = Duration>) {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(delays);
    }

    /// Mutations in completion order, as `"add var_1 x2"`, `"update 3"` or `"remove"`.
    #[must_use]
    pub fn completed(&self) -> Vec<String> {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn pause(&self) {
        let delay = self
            .delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn record(&self, entry: String) {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

#[async_trait]
impl CommerceBackend for DelayedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Simulator
    }

    async fn list_products(&self, limit: u32, offset: u32) -> Result<ProductPage, CommerceError> {
        self.inner.list_products(limit, offset).await
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.inner.get_product(id).await
    }

    async fn create_cart(&self) -> Result<Cart, CommerceError> {
        self.inner.create_cart().await
    }

    async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: Quantity,
    ) -> Result<Cart, CommerceError> {
        self.pause().await;
        let cart = self.inner.add_line_item(cart_id, variant_id, quantity).await;
        self.record(format!("add {variant_id} x{quantity}"));
        cart
    }

    async fn update_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: Quantity,
    ) -> Result<Cart, CommerceError> {
        self.pause().await;
        let cart = self
            .inner
            .update_line_item(cart_id, line_item_id, quantity)
            .await;
        self.record(format!("update {quantity}"));
        cart
    }

    async fn remove_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<Cart, CommerceError> {
        self.pause().await;
        let cart = self.inner.remove_line_item(cart_id, line_item_id).await;
        self.record("remove".to_string());
        cart
    }

    async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, CommerceError> {
        self.inner.get_cart(cart_id).await
    }
}
