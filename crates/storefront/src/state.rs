//! Application state shared by the presentation layer.

use std::sync::Arc;

use medusa_storefront_core::{Product, ProductId, ProductPage};

use crate::cart::{CartIdStorage, CartStore, FileCartIdStorage, Notifier, TracingNotifier};
use crate::commerce::CommerceGateway;
use crate::config::StorefrontConfig;
use crate::error::AppError;

/// Application state shared across the presentation layer.
///
/// Cheaply cloneable via `Arc`; clones share the gateway and the cart store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    gateway: CommerceGateway,
    cart: Arc<CartStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("gateway", &self.inner.gateway)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// The cart id is stored in the file at `config.cart_id_path` and
    /// notifications go to the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote backend client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppError> {
        let gateway = CommerceGateway::from_config(&config)?;
        let storage = Arc::new(FileCartIdStorage::new(config.cart_id_path.clone()));
        Ok(Self::with_parts(
            config,
            gateway,
            storage,
            Arc::new(TracingNotifier),
        ))
    }

    /// Assemble the state from explicit parts.
    #[must_use]
    pub fn with_parts(
        config: StorefrontConfig,
        gateway: CommerceGateway,
        storage: Arc<dyn CartIdStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cart = Arc::new(CartStore::new(gateway.clone(), storage, notifier));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                cart,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the commerce gateway.
    #[must_use]
    pub fn gateway(&self) -> &CommerceGateway {
        &self.inner.gateway
    }

    /// Get the shopper's cart store.
    #[must_use]
    pub fn cart(&self) -> &Arc<CartStore> {
        &self.inner.cart
    }

    /// List a page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if every backend fails.
    pub async fn products(&self, limit: u32, offset: u32) -> Result<ProductPage, AppError> {
        Ok(self.gateway().list_products(limit, offset).await?.into_inner())
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown ids, or another error if
    /// every backend fails.
    pub async fn product(&self, id: &ProductId) -> Result<Product, AppError> {
        Ok(self.gateway().get_product(id).await?.into_inner())
    }
}
