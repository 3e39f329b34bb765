//! Commerce backends and the gateway that routes between them.
//!
//! # Architecture
//!
//! - [`CommerceBackend`] is the request/response contract every backend
//!   satisfies: list products, get a product, create a cart, get a cart and
//!   add/update/remove line items
//! - [`MedusaClient`] implements it over the Medusa store REST API
//! - [`MockCommerce`] implements it in memory with a fixed catalog
//! - [`CommerceGateway`] picks the primary backend once at startup and falls
//!   back to the simulator when a remote call fails
//!
//! # Example
//!
//! ```rust,ignore
//! use medusa_storefront::commerce::{CommerceGateway, MockCommerce};
//!
//! let gateway = CommerceGateway::mock(MockCommerce::new());
//!
//! let page = gateway.list_products(12, 0).await?.into_inner();
//! let cart = gateway.create_cart().await?.into_inner();
//! let cart = gateway
//!     .add_line_item(&cart.id, &VariantId::new("var_6"), Quantity::ONE)
//!     .await?
//!     .into_inner();
//! ```

mod gateway;
pub mod medusa;
pub mod mock;

use async_trait::async_trait;
use medusa_storefront_core::{
    Cart, CartId, LineItemId, Product, ProductId, ProductPage, Quantity, VariantId,
};
use thiserror::Error;

pub use gateway::{CommerceGateway, GatewayError, Routed};
pub use medusa::MedusaClient;
pub use mock::{Latency, MockCommerce};

/// Errors that can occur when talking to a commerce backend.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The request could not be built (e.g., an ID that breaks the URL).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CommerceError {
    /// Whether the failure is worth retrying against the same backend.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::RateLimited(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Parse(_) | Self::NotFound(_) | Self::InvalidRequest(_) => false,
        }
    }

    /// Whether the failure means the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Which implementation served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The remote Medusa backend.
    Medusa,
    /// The in-memory simulator.
    Simulator,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Medusa => f.write_str("medusa"),
            Self::Simulator => f.write_str("simulator"),
        }
    }
}

/// Request/response contract shared by the remote backend and the simulator.
///
/// Every cart operation returns the complete cart snapshot, never a delta.
#[async_trait]
pub trait CommerceBackend: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> BackendKind;

    /// List products, paginated by offset/limit.
    async fn list_products(&self, limit: u32, offset: u32) -> Result<ProductPage, CommerceError>;

    /// Get one product.
    async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError>;

    /// Create a new empty cart.
    async fn create_cart(&self) -> Result<Cart, CommerceError>;

    /// Add a variant to a cart.
    async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: Quantity,
    ) -> Result<Cart, CommerceError>;

    /// Set the quantity of an existing line item.
    async fn update_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: Quantity,
    ) -> Result<Cart, CommerceError>;

    /// Remove a line item.
    async fn remove_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<Cart, CommerceError>;

    /// Fetch a cart.
    async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, CommerceError>;
}
