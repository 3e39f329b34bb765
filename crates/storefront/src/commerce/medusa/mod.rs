//! Medusa store API client.
//!
//! Plain REST over `reqwest` with JSON bodies. Transient failures are retried
//! with exponential backoff; every attempt of one POST carries the same
//! `Idempotency-Key`, so the backend applies a retried mutation at most once.
//! Products are cached using `moka`; carts are always fetched fresh.

mod cache;
mod conversions;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use medusa_storefront_core::{
    Cart, CartId, LineItemId, Product, ProductId, ProductPage, Quantity, VariantId,
};
use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{BackendKind, CommerceBackend, CommerceError};
use crate::config::MedusaConfig;

use cache::{CacheKey, CacheValue};
use conversions::{convert_cart, convert_product, convert_product_page};
use types::{
    AddLineItemRequest, CartResponse, ErrorResponse, ProductResponse, ProductsResponse,
    UpdateLineItemRequest,
};

const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";
const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
const BASE_BACKOFF: Duration = Duration::from_millis(100);
const MAX_RATE_LIMIT_WAIT_SECS: u64 = 5;

// =============================================================================
// MedusaClient
// =============================================================================

/// Client for the Medusa store API.
///
/// Cheap to clone; clones share the HTTP connection pool and product cache.
#[derive(Clone)]
pub struct MedusaClient {
    inner: Arc<MedusaClientInner>,
}

struct MedusaClientInner {
    client: reqwest::Client,
    base_url: Url,
    publishable_key: Option<SecretString>,
    max_retries: u32,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for MedusaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedusaClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("max_retries", &self.inner.max_retries)
            .finish_non_exhaustive()
    }
}

impl MedusaClient {
    /// Create a new client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: Url, config: &MedusaConfig) -> Result<Self, CommerceError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(MedusaClientInner {
                client,
                base_url,
                publishable_key: config.publishable_key.clone(),
                max_retries: config.max_retries,
                cache,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an endpoint URL from path segments and query pairs.
    ///
    /// Segments are percent-encoded so IDs can never alter the path.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, CommerceError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CommerceError::InvalidRequest(format!(
                    "base URL cannot carry a path: {}",
                    self.inner.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }

    /// Send a request, retrying transient failures.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T, CommerceError> {
        // One key per logical call, reused across retries.
        let idempotency_key =
            (method == Method::POST).then(|| uuid::Uuid::new_v4().to_string());

        let mut attempt = 0;
        loop {
            match self
                .send_once(
                    method.clone(),
                    url.clone(),
                    body.as_ref(),
                    idempotency_key.as_deref(),
                )
                .await
            {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.inner.max_retries => {
                    let delay = backoff(attempt, &e);
                    warn!(
                        error = %e,
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Medusa request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
        idempotency_key: Option<&str>,
    ) -> Result<T, CommerceError> {
        let mut request = self
            .inner
            .client
            .request(method, url)
            .header("Accept", "application/json");

        if let Some(key) = &self.inner.publishable_key {
            request = request.header(PUBLISHABLE_KEY_HEADER, key.expose_secret());
        }
        if let Some(key) = idempotency_key {
            request = request.header(IDEMPOTENCY_KEY_HEADER, key);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CommerceError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&response_text);
            if status == StatusCode::NOT_FOUND {
                return Err(CommerceError::NotFound(message));
            }

            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Medusa API returned non-success status"
            );
            return Err(CommerceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse Medusa response"
            );
            CommerceError::Parse(e)
        })
    }
}

/// Delay before retry number `attempt + 1`.
fn backoff(attempt: u32, error: &CommerceError) -> Duration {
    if let CommerceError::RateLimited(secs) = error {
        return Duration::from_secs((*secs).min(MAX_RATE_LIMIT_WAIT_SECS));
    }
    let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
    BASE_BACKOFF.saturating_mul(factor)
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.message.or(e.kind))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

// =============================================================================
// CommerceBackend
// =============================================================================

#[async_trait]
impl CommerceBackend for MedusaClient {
    fn kind(&self) -> BackendKind {
        BackendKind::Medusa
    }

    #[instrument(skip(self))]
    async fn list_products(&self, limit: u32, offset: u32) -> Result<ProductPage, CommerceError> {
        let cache_key = CacheKey::Products { limit, offset };

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let url = self.endpoint(
            &["store", "products"],
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )?;
        let response: ProductsResponse = self.execute(Method::GET, url, None).await?;
        let page = convert_product_page(response);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["store", "products", id.as_str()], &[])?;
        let response: ProductResponse = self.execute(Method::GET, url, None).await?;
        let product = convert_product(response.product);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn create_cart(&self) -> Result<Cart, CommerceError> {
        let url = self.endpoint(&["store", "carts"], &[])?;
        let response: CartResponse = self
            .execute(Method::POST, url, Some(serde_json::json!({})))
            .await?;
        Ok(convert_cart(response.cart))
    }

    #[instrument(skip(self), fields(cart_id = %cart_id, variant_id = %variant_id))]
    async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: Quantity,
    ) -> Result<Cart, CommerceError> {
        let url = self.endpoint(&["store", "carts", cart_id.as_str(), "line-items"], &[])?;
        let body = serde_json::to_value(AddLineItemRequest {
            variant_id: variant_id.as_str(),
            quantity: quantity.get(),
        })?;
        let response: CartResponse = self.execute(Method::POST, url, Some(body)).await?;
        Ok(convert_cart(response.cart))
    }

    #[instrument(skip(self), fields(cart_id = %cart_id, line_item_id = %line_item_id))]
    async fn update_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: Quantity,
    ) -> Result<Cart, CommerceError> {
        let url = self.endpoint(
            &["store", "carts", cart_id.as_str(), "line-items", line_item_id.as_str()],
            &[],
        )?;
        let body = serde_json::to_value(UpdateLineItemRequest {
            quantity: quantity.get(),
        })?;
        let response: CartResponse = self.execute(Method::POST, url, Some(body)).await?;
        Ok(convert_cart(response.cart))
    }

    #[instrument(skip(self), fields(cart_id = %cart_id, line_item_id = %line_item_id))]
    async fn remove_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<Cart, CommerceError> {
        let url = self.endpoint(
            &["store", "carts", cart_id.as_str(), "line-items", line_item_id.as_str()],
            &[],
        )?;
        let response: CartResponse = self.execute(Method::DELETE, url, None).await?;
        Ok(convert_cart(response.cart))
    }

    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, CommerceError> {
        let url = self.endpoint(&["store", "carts", cart_id.as_str()], &[])?;
        let response: CartResponse = self.execute(Method::GET, url, None).await?;
        Ok(convert_cart(response.cart))
    }
}
