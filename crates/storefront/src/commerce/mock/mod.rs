//! In-memory commerce simulator.
//!
//! Stands in for the Medusa backend during development, offline use and as
//! the gateway's fallback. Products come from a fixed catalog; carts live in
//! memory for the lifetime of the process only.
//!
//! Line items accumulate per cart, keyed by variant: adding a variant that is
//! already in the cart increases its quantity instead of adding a second
//! line.

mod catalog;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use medusa_storefront_core::{
    Cart, CartId, LineItem, LineItemId, LineItemProduct, LineItemVariant, Product, ProductId,
    ProductPage, ProductVariant, Quantity, VariantId,
};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::{BackendKind, CommerceBackend, CommerceError};

/// Whether simulator calls pause to imitate network latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Latency {
    /// Fixed per-operation delays between 200 and 500 ms.
    Simulated,
    /// Answer immediately.
    None,
}

impl Latency {
    async fn wait(self, millis: u64) {
        if self == Self::Simulated {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

const LIST_PRODUCTS_DELAY_MS: u64 = 500;
const GET_PRODUCT_DELAY_MS: u64 = 300;
const CREATE_CART_DELAY_MS: u64 = 200;
const MUTATE_CART_DELAY_MS: u64 = 300;
const GET_CART_DELAY_MS: u64 = 200;

/// Mock commerce backend with a fixed 8-product catalog.
#[derive(Debug)]
pub struct MockCommerce {
    products: Vec<Product>,
    carts: Mutex<HashMap<CartId, Cart>>,
    latency: Latency,
    sequence: AtomicU64,
}

impl Default for MockCommerce {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommerce {
    /// Create a simulator that imitates network latency.
    #[must_use]
    pub fn new() -> Self {
        Self::with_latency(Latency::Simulated)
    }

    /// Create a simulator that answers immediately.
    #[must_use]
    pub fn without_latency() -> Self {
        Self::with_latency(Latency::None)
    }

    /// Create a simulator with the given latency behavior.
    #[must_use]
    pub fn with_latency(latency: Latency) -> Self {
        Self {
            products: catalog::products(),
            carts: Mutex::new(HashMap::new()),
            latency,
            sequence: AtomicU64::new(0),
        }
    }

    /// The full catalog.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Time-based unique identifier with the given prefix.
    fn next_id(&self, prefix: &str) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let millis = chrono::Utc::now().timestamp_millis();
        format!("{prefix}_{millis}_{seq}")
    }

    fn find_variant(&self, variant_id: &VariantId) -> Option<(&Product, &ProductVariant)> {
        self.products.iter().find_map(|product| {
            product
                .find_variant(variant_id)
                .map(|variant| (product, variant))
        })
    }
}

/// Recompute simulated totals. No shipping or tax in the simulator.
fn recompute_totals(cart: &mut Cart) {
    let subtotal = cart.items.iter().map(LineItem::line_total).sum();
    cart.subtotal = subtotal;
    cart.shipping_total = 0;
    cart.tax_total = 0;
    cart.total = subtotal;
}

#[async_trait]
impl CommerceBackend for MockCommerce {
    fn kind(&self) -> BackendKind {
        BackendKind::Simulator
    }

    #[instrument(skip(self))]
    async fn list_products(&self, limit: u32, offset: u32) -> Result<ProductPage, CommerceError> {
        self.latency.wait(LIST_PRODUCTS_DELAY_MS).await;

        let products = self
            .products
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(ProductPage {
            products,
            count: self.products.len() as u64,
        })
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.latency.wait(GET_PRODUCT_DELAY_MS).await;

        self.products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::NotFound(format!("Product not found: {id}")))
    }

    #[instrument(skip(self))]
    async fn create_cart(&self) -> Result<Cart, CommerceError> {
        self.latency.wait(CREATE_CART_DELAY_MS).await;

        let cart = Cart::empty(CartId::new(self.next_id("cart")));
        self.carts.lock().await.insert(cart.id.clone(), cart.clone());
        debug!(cart_id = %cart.id, "Simulated cart created");
        Ok(cart)
    }

    #[instrument(skip(self), fields(cart_id = %cart_id, variant_id = %variant_id))]
    async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: Quantity,
    ) -> Result<Cart, CommerceError> {
        self.latency.wait(MUTATE_CART_DELAY_MS).await;

        let (product, variant) = self
            .find_variant(variant_id)
            .ok_or_else(|| CommerceError::NotFound(format!("Variant not found: {variant_id}")))?;

        let mut carts = self.carts.lock().await;
        let cart = carts
            .entry(cart_id.clone())
            .or_insert_with(|| Cart::empty(cart_id.clone()));

        if let Some(existing) = cart.items.iter_mut().find(|i| &i.variant.id == variant_id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            cart.items.push(LineItem {
                id: LineItemId::new(self.next_id("item")),
                title: product.title.clone(),
                quantity,
                unit_price: variant.active_price().unwrap_or_default(),
                variant: LineItemVariant {
                    id: variant.id.clone(),
                    title: variant.title.clone(),
                    product: LineItemProduct {
                        title: product.title.clone(),
                        images: product.images.clone(),
                    },
                },
            });
        }

        recompute_totals(cart);
        Ok(cart.clone())
    }

    #[instrument(skip(self), fields(cart_id = %cart_id, line_item_id = %line_item_id))]
    async fn update_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: Quantity,
    ) -> Result<Cart, CommerceError> {
        self.latency.wait(MUTATE_CART_DELAY_MS).await;

        let line_not_found =
            || CommerceError::NotFound(format!("Line item not found: {line_item_id}"));

        // Line edits never adopt an unknown cart.
        let mut carts = self.carts.lock().await;
        let cart = carts.get_mut(cart_id).ok_or_else(line_not_found)?;

        let item = cart
            .items
            .iter_mut()
            .find(|i| &i.id == line_item_id)
            .ok_or_else(line_not_found)?;
        item.quantity = quantity;

        recompute_totals(cart);
        Ok(cart.clone())
    }

    #[instrument(skip(self), fields(cart_id = %cart_id, line_item_id = %line_item_id))]
    async fn remove_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<Cart, CommerceError> {
        self.latency.wait(MUTATE_CART_DELAY_MS).await;

        let line_not_found =
            || CommerceError::NotFound(format!("Line item not found: {line_item_id}"));

        let mut carts = self.carts.lock().await;
        let cart = carts.get_mut(cart_id).ok_or_else(line_not_found)?;

        let before = cart.items.len();
        cart.items.retain(|i| &i.id != line_item_id);
        if cart.items.len() == before {
            return Err(line_not_found());
        }

        recompute_totals(cart);
        Ok(cart.clone())
    }

    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, CommerceError> {
        self.latency.wait(GET_CART_DELAY_MS).await;

        self.carts
            .lock()
            .await
            .get(cart_id)
            .cloned()
            .ok_or_else(|| CommerceError::NotFound(format!("Cart not found: {cart_id}")))
    }
}
