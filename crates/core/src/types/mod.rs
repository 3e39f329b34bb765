//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod quantity;

pub use cart::{Cart, LineItem, LineItemProduct, LineItemVariant};
pub use id::*;
pub use price::{CurrencyCode, Price, UnknownCurrency, minor_to_major};
pub use product::{Image, Product, ProductPage, ProductVariant, VariantPrice};
pub use quantity::{Quantity, ZeroQuantity};
