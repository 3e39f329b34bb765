//! Storefront configuration loaded from environment variables.
//!
//! Configuration is read once at startup. The backend mode is fixed for the
//! lifetime of the process; the gateway never re-reads it per call.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_BACKEND_URL` - Medusa backend base URL (unset = mock mode)
//! - `STOREFRONT_USE_MOCK_DATA` - Force mock mode even with a URL (default: false)
//! - `STOREFRONT_PUBLISHABLE_KEY` - Medusa publishable API key
//! - `STOREFRONT_BACKEND_MAX_RETRIES` - Retries for transient failures (default: 3)
//! - `STOREFRONT_BACKEND_TIMEOUT_SECS` - HTTP request timeout (default: 10)
//! - `STOREFRONT_PRODUCT_CACHE_TTL_SECS` - Product cache TTL (default: 300)
//! - `STOREFRONT_MOCK_LATENCY` - Simulate network latency in mock mode (default: true)
//! - `STOREFRONT_CART_ID_PATH` - File holding the persisted cart ID (default: .storefront/cart_id)
//! - `STOREFRONT_CURRENCY` - Display currency (default: EUR)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use medusa_storefront_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_MAX_RETRIES: &str = "3";
const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: &str = "300";
const DEFAULT_CART_ID_PATH: &str = ".storefront/cart_id";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which backend the gateway treats as primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendMode {
    /// Serve everything from the in-memory simulator.
    Mock,
    /// Call the Medusa backend at this base URL, falling back to the simulator.
    Remote(Url),
}

impl BackendMode {
    /// Whether the simulator is the primary backend.
    #[must_use]
    pub const fn is_mock(&self) -> bool {
        matches!(self, Self::Mock)
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend selection
    pub backend: BackendMode,
    /// Medusa client settings (used in remote mode)
    pub medusa: MedusaConfig,
    /// Simulate network latency in the mock simulator
    pub mock_latency: bool,
    /// Where the cart ID is persisted between runs
    pub cart_id_path: PathBuf,
    /// Currency used to display prices
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Medusa store API client configuration.
///
/// Implements `Debug` manually to redact the publishable key.
#[derive(Clone)]
pub struct MedusaConfig {
    /// Publishable API key sent with every request
    pub publishable_key: Option<SecretString>,
    /// Retry attempts for transient failures
    pub max_retries: u32,
    /// Per-request timeout
    pub timeout: Duration,
    /// Product cache time-to-live
    pub product_cache_ttl: Duration,
}

impl std::fmt::Debug for MedusaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MedusaConfig")
            .field(
                "publishable_key",
                &self.publishable_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .field("product_cache_ttl", &self.product_cache_ttl)
            .finish()
    }
}

impl Default for MedusaConfig {
    fn default() -> Self {
        Self {
            publishable_key: None,
            max_retries: 3,
            timeout: Duration::from_secs(10),
            product_cache_ttl: Duration::from_secs(300),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let force_mock = env.parse_or("STOREFRONT_USE_MOCK_DATA", "false", parse_bool)?;
        let backend = match env.optional("STOREFRONT_BACKEND_URL") {
            Some(raw) if !force_mock => {
                let url = Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("STOREFRONT_BACKEND_URL".to_string(), e.to_string())
                })?;
                BackendMode::Remote(url)
            }
            _ => BackendMode::Mock,
        };

        let medusa = MedusaConfig {
            publishable_key: env
                .optional("STOREFRONT_PUBLISHABLE_KEY")
                .map(SecretString::from),
            max_retries: env.parse_or(
                "STOREFRONT_BACKEND_MAX_RETRIES",
                DEFAULT_MAX_RETRIES,
                parse_from_str::<u32>,
            )?,
            timeout: Duration::from_secs(env.parse_or(
                "STOREFRONT_BACKEND_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
                parse_from_str::<u64>,
            )?),
            product_cache_ttl: Duration::from_secs(env.parse_or(
                "STOREFRONT_PRODUCT_CACHE_TTL_SECS",
                DEFAULT_PRODUCT_CACHE_TTL_SECS,
                parse_from_str::<u64>,
            )?),
        };

        Ok(Self {
            backend,
            medusa,
            mock_latency: env.parse_or("STOREFRONT_MOCK_LATENCY", "true", parse_bool)?,
            cart_id_path: PathBuf::from(
                env.or_default("STOREFRONT_CART_ID_PATH", DEFAULT_CART_ID_PATH),
            ),
            currency: env.parse_or("STOREFRONT_CURRENCY", "EUR", parse_from_str::<CurrencyCode>)?,
            sentry_dsn: env.optional("SENTRY_DSN"),
        })
    }

    /// Configuration for mock mode with defaults, used by tests and demos.
    #[must_use]
    pub fn mock() -> Self {
        Self {
            backend: BackendMode::Mock,
            medusa: MedusaConfig::default(),
            mock_latency: false,
            cart_id_path: PathBuf::from(DEFAULT_CART_ID_PATH),
            currency: CurrencyCode::default(),
            sentry_dsn: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable (or its default) with the given parser.
    fn parse_or<T>(
        &self,
        key: &str,
        default: &str,
        parse: fn(&str) -> Result<T, String>,
    ) -> Result<T, ConfigError> {
        let raw = self.or_default(key, default);
        parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}

fn parse_from_str<T>(raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| e.to_string())
}
