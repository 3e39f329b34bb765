//! Wire types for the Medusa store API.
//!
//! These mirror the JSON the backend sends. Everything the storefront does
//! not strictly need is optional so that schema drift on the backend does not
//! break deserialization. See `conversions` for the mapping into domain types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Response Envelopes
// =============================================================================

/// `GET /store/products`
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<MedusaProduct>,
    pub count: Option<u64>,
}

/// `GET /store/products/{id}`
#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    pub product: MedusaProduct,
}

/// Every cart endpoint.
#[derive(Debug, Deserialize)]
pub struct CartResponse {
    pub cart: MedusaCart,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct MedusaImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct MedusaPrice {
    pub amount: i64,
    pub currency_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MedusaVariant {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub prices: Vec<MedusaPrice>,
}

#[derive(Debug, Deserialize)]
pub struct MedusaProduct {
    pub id: String,
    pub title: String,
    pub handle: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<MedusaImage>,
    #[serde(default)]
    pub variants: Vec<MedusaVariant>,
}

// =============================================================================
// Carts
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct MedusaLineItemProduct {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<MedusaImage>,
}

#[derive(Debug, Deserialize)]
pub struct MedusaLineItemVariant {
    pub id: String,
    pub title: Option<String>,
    pub product: Option<MedusaLineItemProduct>,
}

#[derive(Debug, Deserialize)]
pub struct MedusaLineItem {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub thumbnail: Option<String>,
    pub variant_id: Option<String>,
    pub variant: Option<MedusaLineItemVariant>,
}

#[derive(Debug, Deserialize)]
pub struct MedusaCart {
    pub id: String,
    #[serde(default)]
    pub items: Vec<MedusaLineItem>,
    pub subtotal: Option<i64>,
    pub shipping_total: Option<i64>,
    pub tax_total: Option<i64>,
    pub total: Option<i64>,
}

// =============================================================================
// Request Bodies
// =============================================================================

/// `POST /store/carts/{id}/line-items`
#[derive(Debug, Serialize)]
pub struct AddLineItemRequest<'a> {
    pub variant_id: &'a str,
    pub quantity: u32,
}

/// `POST /store/carts/{id}/line-items/{line_id}`
#[derive(Debug, Serialize)]
pub struct UpdateLineItemRequest {
    pub quantity: u32,
}
