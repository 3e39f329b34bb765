//! Medusa storefront library.
//!
//! Cart state management and catalog access for a headless Medusa store,
//! with an in-memory simulator standing in when the backend is unavailable
//! or not configured.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod commerce;
pub mod config;
pub mod error;
pub mod state;

pub use error::AppError;
pub use state::AppState;
