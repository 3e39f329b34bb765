//! Routing between the configured backend and the simulator.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use medusa_storefront_core::{
    Cart, CartId, LineItemId, Product, ProductId, ProductPage, Quantity, VariantId,
};
use thiserror::Error;
use tracing::{instrument, warn};

use super::mock::{Latency, MockCommerce};
use super::{BackendKind, CommerceBackend, CommerceError, MedusaClient};
use crate::config::{BackendMode, StorefrontConfig};

type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CommerceError>> + Send + 'a>>;

// =============================================================================
// Routed
// =============================================================================

/// A gateway result tagged with the backend that produced it.
#[derive(Debug)]
pub enum Routed<T> {
    /// The configured backend answered.
    Primary(T),
    /// The remote backend failed with `cause` and the simulator answered.
    Fallback {
        /// Simulator result.
        value: T,
        /// Why the remote call failed.
        cause: CommerceError,
    },
}

impl<T> Routed<T> {
    /// Discard the tag.
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Primary(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Borrow the value.
    #[must_use]
    pub const fn value(&self) -> &T {
        match self {
            Self::Primary(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Whether the simulator stood in for a failing remote.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// A gateway call that failed on every backend it tried.
#[derive(Debug, Error)]
#[error("{operation} failed: {error}")]
pub struct GatewayError {
    /// Name of the failed operation.
    pub operation: &'static str,
    /// Error from the last backend tried.
    #[source]
    pub error: CommerceError,
    /// Error from the remote backend when the simulator was tried after it.
    pub primary_cause: Option<CommerceError>,
}

impl GatewayError {
    /// Whether the final failure means the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.error.is_not_found()
    }
}

// =============================================================================
// CommerceGateway
// =============================================================================

/// Single entry point for catalog and cart operations.
///
/// The primary backend is fixed at construction. In remote mode every failed
/// call is retried once against the simulator.
#[derive(Clone)]
pub struct CommerceGateway {
    primary: Arc<dyn CommerceBackend>,
    fallback: Option<Arc<MockCommerce>>,
}

impl std::fmt::Debug for CommerceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceGateway")
            .field("primary", &self.primary.kind())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl CommerceGateway {
    /// Gateway over a single backend, without fallback.
    #[must_use]
    pub fn new(primary: Arc<dyn CommerceBackend>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Gateway that only talks to the simulator.
    #[must_use]
    pub fn mock(simulator: MockCommerce) -> Self {
        Self::new(Arc::new(simulator))
    }

    /// Gateway over a remote backend with the simulator as fallback.
    #[must_use]
    pub fn with_fallback(primary: Arc<dyn CommerceBackend>, simulator: MockCommerce) -> Self {
        Self {
            primary,
            fallback: Some(Arc::new(simulator)),
        }
    }

    /// Build the gateway the configuration asks for.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, CommerceError> {
        let latency = if config.mock_latency {
            Latency::Simulated
        } else {
            Latency::None
        };
        let simulator = MockCommerce::with_latency(latency);

        match &config.backend {
            BackendMode::Mock => Ok(Self::mock(simulator)),
            BackendMode::Remote(url) => {
                let client = MedusaClient::new(url.clone(), &config.medusa)?;
                Ok(Self::with_fallback(Arc::new(client), simulator))
            }
        }
    }

    /// Which backend answers first.
    #[must_use]
    pub fn primary_kind(&self) -> BackendKind {
        self.primary.kind()
    }

    async fn route<'a, T>(
        &self,
        operation: &'static str,
        primary: BackendFuture<'a, T>,
        fallback: Option<BackendFuture<'a, T>>,
    ) -> Result<Routed<T>, GatewayError> {
        let cause = match primary.await {
            Ok(value) => return Ok(Routed::Primary(value)),
            Err(e) => e,
        };

        let Some(fallback) = fallback else {
            return Err(GatewayError {
                operation,
                error: cause,
                primary_cause: None,
            });
        };

        warn!(
            operation,
            primary = %self.primary.kind(),
            error = %cause,
            "Primary backend failed, falling back to simulator"
        );

        match fallback.await {
            Ok(value) => Ok(Routed::Fallback { value, cause }),
            Err(error) => Err(GatewayError {
                operation,
                error,
                primary_cause: Some(cause),
            }),
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List products.
    ///
    /// # Errors
    ///
    /// Returns an error if every backend tried fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Routed<ProductPage>, GatewayError> {
        self.route(
            "list_products",
            self.primary.list_products(limit, offset),
            self.fallback.as_ref().map(|f| f.list_products(limit, offset)),
        )
        .await
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns an error if every backend tried fails, including not-found.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Routed<Product>, GatewayError> {
        self.route(
            "get_product",
            self.primary.get_product(id),
            self.fallback.as_ref().map(|f| f.get_product(id)),
        )
        .await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Create a new empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if every backend tried fails.
    #[instrument(skip(self))]
    pub async fn create_cart(&self) -> Result<Routed<Cart>, GatewayError> {
        self.route(
            "create_cart",
            self.primary.create_cart(),
            self.fallback.as_ref().map(|f| f.create_cart()),
        )
        .await
    }

    /// Add a variant to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if every backend tried fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, variant_id = %variant_id))]
    pub async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: Quantity,
    ) -> Result<Routed<Cart>, GatewayError> {
        self.route(
            "add_line_item",
            self.primary.add_line_item(cart_id, variant_id, quantity),
            self.fallback
                .as_ref()
                .map(|f| f.add_line_item(cart_id, variant_id, quantity)),
        )
        .await
    }

    /// Set the quantity of a line item.
    ///
    /// # Errors
    ///
    /// Returns an error if every backend tried fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, line_item_id = %line_item_id))]
    pub async fn update_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: Quantity,
    ) -> Result<Routed<Cart>, GatewayError> {
        self.route(
            "update_line_item",
            self.primary.update_line_item(cart_id, line_item_id, quantity),
            self.fallback
                .as_ref()
                .map(|f| f.update_line_item(cart_id, line_item_id, quantity)),
        )
        .await
    }

    /// Remove a line item.
    ///
    /// # Errors
    ///
    /// Returns an error if every backend tried fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, line_item_id = %line_item_id))]
    pub async fn remove_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<Routed<Cart>, GatewayError> {
        self.route(
            "remove_line_item",
            self.primary.remove_line_item(cart_id, line_item_id),
            self.fallback
                .as_ref()
                .map(|f| f.remove_line_item(cart_id, line_item_id)),
        )
        .await
    }

    /// Fetch a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if every backend tried fails, including not-found.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Routed<Cart>, GatewayError> {
        self.route(
            "get_cart",
            self.primary.get_cart(cart_id),
            self.fallback.as_ref().map(|f| f.get_cart(cart_id)),
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Remote stand-in that fails every call with a server error.
    #[derive(Default)]
    struct DownBackend {
        calls: AtomicUsize,
    }

    impl DownBackend {
        fn fail<T>(&self) -> Result<T, CommerceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CommerceError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    #[async_trait]
    impl CommerceBackend for DownBackend {
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

    fn down_gateway() -> (CommerceGateway, Arc<DownBackend>) {
        let down = Arc::new(DownBackend::default());
        let gateway = CommerceGateway::with_fallback(down.clone(), MockCommerce::without_latency());
        (gateway, down)
    }

    #[tokio::test]
    async fn test_mock_gateway_answers_as_primary() {
        let gateway = CommerceGateway::mock(MockCommerce::without_latency());

        let page = gateway.list_products(12, 0).await.unwrap();

        assert!(!page.is_fallback());
        assert_eq!(page.value().count, 8);
        assert_eq!(gateway.primary_kind(), BackendKind::Simulator);
    }

    #[tokio::test]
    async fn test_mock_gateway_error_has_no_primary_cause() {
        let gateway = CommerceGateway::mock(MockCommerce::without_latency());

        let err = gateway
            .get_product(&ProductId::new("does-not-exist"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(err.primary_cause.is_none());
        assert_eq!(err.operation, "get_product");
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_simulator() {
        let (gateway, down) = down_gateway();

        let routed = gateway.create_cart().await.unwrap();

        assert!(routed.is_fallback());
        let Routed::Fallback { value, cause } = routed else {
            panic!("expected fallback");
        };
        assert!(value.is_empty());
        assert!(matches!(cause, CommerceError::Api { status: 503, .. }));
        assert_eq!(down.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_carries_simulator_result() {
        let (gateway, _) = down_gateway();
        let cart = gateway.create_cart().await.unwrap().into_inner();

        let cart = gateway
            .add_line_item(&cart.id, &VariantId::new("var_6"), Quantity::new(2).unwrap())
            .await
            .unwrap()
            .into_inner();

        assert_eq!(cart.subtotal, 55_800);
        assert_eq!(cart.total, 55_800);
    }

    #[tokio::test]
    async fn test_error_when_simulator_also_fails() {
        let (gateway, _) = down_gateway();

        let err = gateway
            .get_product(&ProductId::new("does-not-exist"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(matches!(
            err.primary_cause,
            Some(CommerceError::Api { status: 503, .. })
        ));
    }

    #[test]
    fn test_from_config_selects_backend() {
        let gateway = CommerceGateway::from_config(&StorefrontConfig::mock()).unwrap();
        assert_eq!(gateway.primary_kind(), BackendKind::Simulator);

        let mut config = StorefrontConfig::mock();
        config.backend = BackendMode::Remote(url::Url::parse("http://localhost:9000").unwrap());
        let gateway = CommerceGateway::from_config(&config).unwrap();
        assert_eq!(gateway.primary_kind(), BackendKind::Medusa);
        assert!(format!("{gateway:?}").contains("fallback: true"));
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError {
            operation: "get_cart",
            error: CommerceError::NotFound("cart_1".to_string()),
            primary_cause: None,
        };
        assert_eq!(err.to_string(), "get_cart failed: Not found: cart_1");
    }
}
