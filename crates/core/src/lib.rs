//! Medusa Storefront Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront library and the CLI:
//! - `storefront` - Commerce gateway, mock simulator and cart store
//! - `cli` - Command-line presentation layer
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! Backends convert their wire formats into these types, and the cart store
//! only ever holds these types.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, money, quantities, products and carts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
