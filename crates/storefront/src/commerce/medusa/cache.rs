//! Cache types for Medusa API responses.
//!
//! Only catalog reads are cached. Carts are mutable state and always go to
//! the backend.

use medusa_storefront_core::{Product, ProductId, ProductPage};

/// Cache key for products and product pages.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products { limit: u32, offset: u32 },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductPage),
}
