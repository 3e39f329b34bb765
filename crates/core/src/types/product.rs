//! Catalog types.
//!
//! Products are read-only from the storefront's point of view. They come from
//! the commerce backend (or the mock catalog) and are never mutated locally.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};

/// Product or variant image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
}

impl Image {
    /// Create an image reference from a URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// One price entry of a variant, in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPrice {
    /// Amount in minor currency units.
    pub amount: i64,
    /// ISO 4217 currency code as reported by the backend, if any.
    pub currency_code: Option<String>,
}

/// A purchasable SKU of a product (e.g., "256GB - Natural Titanium").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title (size/color/capacity descriptor).
    pub title: String,
    /// Price entries. Only the first one is used.
    pub prices: Vec<VariantPrice>,
}

impl ProductVariant {
    /// The active price in minor units: the first price entry.
    ///
    /// Multi-currency and region pricing are not resolved.
    #[must_use]
    pub fn active_price(&self) -> Option<i64> {
        self.prices.first().map(|p| p.amount)
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: Option<String>,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// Product images, in display order.
    pub images: Vec<Image>,
    /// Product variants, in display order.
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// The representative image: the first one.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&Image> {
        self.images.first()
    }

    /// Find one of this product's variants by ID.
    #[must_use]
    pub fn find_variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Lowest active price across variants, for "from" labels.
    #[must_use]
    pub fn min_price(&self) -> Option<i64> {
        self.variants
            .iter()
            .filter_map(ProductVariant::active_price)
            .min()
    }
}

/// A page of products with the total catalog size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page.
    pub products: Vec<Product>,
    /// Total number of products across all pages.
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: &str, prices: &[i64]) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(id),
            title: id.to_string(),
            prices: prices
                .iter()
                .map(|&amount| VariantPrice {
                    amount,
                    currency_code: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_active_price_is_first_entry() {
        let v = variant("var_1", &[119_900, 99_900]);
        assert_eq!(v.active_price(), Some(119_900));
        assert_eq!(variant("var_2", &[]).active_price(), None);
    }

    #[test]
    fn test_product_helpers() {
        let product = Product {
            id: ProductId::new("prod_1"),
            handle: None,
            title: "Phone".to_string(),
            description: String::new(),
            images: vec![Image::new("https://a"), Image::new("https://b")],
            variants: vec![variant("var_1", &[500]), variant("var_2", &[300])],
        };

        assert_eq!(product.thumbnail().map(|i| i.url.as_str()), Some("https://a"));
        assert_eq!(product.min_price(), Some(300));
        assert!(product.find_variant(&VariantId::new("var_2")).is_some());
        assert!(product.find_variant(&VariantId::new("var_9")).is_none());
    }
}
