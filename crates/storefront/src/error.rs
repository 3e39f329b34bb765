//! Application-level error type.
//!
//! Everything the outer layers (the CLI) can fail with. The cart store
//! never returns errors; these come from startup and catalog lookups.

use thiserror::Error;

use crate::cart::StorageError;
use crate::commerce::{CommerceError, GatewayError};
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A backend client could not be built.
    #[error("Commerce error: {0}")]
    Commerce(#[from] CommerceError),

    /// A gateway call failed on every backend.
    #[error("Gateway error: {0}")]
    Gateway(GatewayError),

    /// Cart id storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let GatewayError {
            operation,
            error,
            primary_cause,
        } = err;

        match error {
            CommerceError::NotFound(what) => Self::NotFound(what),
            error => Self::Gateway(GatewayError {
                operation,
                error,
                primary_cause,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_gateway_error_maps_to_not_found() {
        let err = AppError::from(GatewayError {
            operation: "get_product",
            error: CommerceError::NotFound("product does-not-exist".to_string()),
            primary_cause: None,
        });
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Not found: product does-not-exist");
    }

    #[test]
    fn test_other_gateway_errors_are_kept() {
        let err = AppError::from(GatewayError {
            operation: "list_products",
            error: CommerceError::RateLimited(3),
            primary_cause: None,
        });
        assert!(matches!(err, AppError::Gateway(_)));
    }
}
