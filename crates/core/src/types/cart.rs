//! Cart types.
//!
//! A `Cart` is always a complete snapshot as returned by the backend. Totals
//! are authoritative from the backend's last response and are never
//! recomputed on the client.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartId, LineItemId, VariantId};
use super::price::minor_to_major;
use super::product::Image;
use super::quantity::Quantity;

/// Parent product data denormalized onto a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemProduct {
    /// Product title.
    pub title: String,
    /// Product images.
    pub images: Vec<Image>,
}

/// The variant a line item was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title.
    pub title: String,
    /// Parent product display data.
    pub product: LineItemProduct,
}

/// One variant + quantity entry in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item ID, unique within the cart.
    pub id: LineItemId,
    /// Display title.
    pub title: String,
    /// Quantity (at least 1).
    pub quantity: Quantity,
    /// Unit price in minor units.
    pub unit_price: i64,
    /// Originating variant.
    pub variant: LineItemVariant,
}

impl LineItem {
    /// Unit price times quantity, in minor units.
    #[must_use]
    pub fn line_total(&self) -> i64 {
        self.unit_price.saturating_mul(i64::from(self.quantity.get()))
    }

    /// First image of the parent product, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.variant
            .product
            .images
            .first()
            .map(|image| image.url.as_str())
    }
}

/// A shopping cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Line items, in backend order.
    pub items: Vec<LineItem>,
    /// Subtotal in minor units.
    pub subtotal: i64,
    /// Shipping total in minor units.
    pub shipping_total: i64,
    /// Tax total in minor units.
    pub tax_total: i64,
    /// Grand total in minor units.
    pub total: i64,
}

impl Cart {
    /// An empty cart with zero totals.
    #[must_use]
    pub const fn empty(id: CartId) -> Self {
        Self {
            id,
            items: Vec::new(),
            subtotal: 0,
            shipping_total: 0,
            tax_total: 0,
            total: 0,
        }
    }

    /// Sum of quantities across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Grand total converted from minor to major units.
    #[must_use]
    pub fn total_major(&self) -> Decimal {
        minor_to_major(self.total)
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a line item by ID.
    #[must_use]
    pub fn line_item(&self, id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: u32, unit_price: i64) -> LineItem {
        LineItem {
            id: LineItemId::new(id),
            title: "AirPods Pro".to_string(),
            quantity: Quantity::new(quantity).unwrap(),
            unit_price,
            variant: LineItemVariant {
                id: VariantId::new("var_6"),
                title: "Standard".to_string(),
                product: LineItemProduct {
                    title: "AirPods Pro".to_string(),
                    images: vec![Image::new("https://img/airpods.jpg")],
                },
            },
        }
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = Cart::empty(CartId::new("cart_1"));
        assert_eq!(cart.item_count(), 0);

        cart.items.push(item("item_1", 2, 27_900));
        cart.items.push(item("item_2", 3, 9_900));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_total_major() {
        let mut cart = Cart::empty(CartId::new("cart_1"));
        cart.total = 55_800;
        assert_eq!(cart.total_major(), Decimal::new(558, 0));
    }

    #[test]
    fn test_line_item_helpers() {
        let line = item("item_1", 2, 27_900);
        assert_eq!(line.line_total(), 55_800);
        assert_eq!(line.image_url(), Some("https://img/airpods.jpg"));
    }

    #[test]
    fn test_line_item_lookup() {
        let mut cart = Cart::empty(CartId::new("cart_1"));
        cart.items.push(item("item_1", 1, 100));
        assert!(cart.line_item(&LineItemId::new("item_1")).is_some());
        assert!(cart.line_item(&LineItemId::new("item_2")).is_none());
    }
}
