//! # Storefront Configuration
//!
//! Everything the server reads once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     FURNISH_BIND_ADDR=0.0.0.0:8080                                      │
//! │     FURNISH_TAX_RATE=18                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     $FURNISH_CONFIG, or                                                 │
//! │     ~/.config/storefront/storefront.toml (Linux)                        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     127.0.0.1:3000, ./furnish.db, INR, ₹2000 / ₹200 / 18%               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0:8080"
//!
//! [database]
//! path = "/var/lib/furnish/furnish.db"
//! max_connections = 5
//!
//! [store]
//! name = "Furnish"
//! currency_code = "INR"
//! currency_symbol = "₹"
//! currency_decimals = 2
//!
//! [pricing]
//! free_shipping_threshold_minor = 200000
//! flat_shipping_minor = 20000
//! tax_rate_bps = 1800
//!
//! [checkout]
//! processing_delay_ms = 2000
//! ```
//!
//! ## Thread Safety
//! Read-only after load; shared through `Arc<AppState>` without a lock.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use furnish_core::pricing::{DEFAULT_FLAT_SHIPPING, DEFAULT_FREE_SHIPPING_THRESHOLD, DEFAULT_TAX_RATE};
use furnish_core::{Money, PricingPolicy, TaxRate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "FURNISH_CONFIG";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file, created on first start.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Load the demo catalog when the products table is empty.
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./furnish.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_db_path(),
            max_connections: default_max_connections(),
            seed_demo_data: default_true(),
        }
    }
}

/// Store identity and how money is shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// ISO 4217
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,
}

fn default_store_name() -> String {
    "Furnish".to_string()
}

fn default_currency_code() -> String {
    "INR".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
        }
    }
}

/// Shipping and GST, in minor units and basis points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_threshold")]
    pub free_shipping_threshold_minor: i64,

    #[serde(default = "default_flat_shipping")]
    pub flat_shipping_minor: i64,

    #[serde(default = "default_tax_bps")]
    pub tax_rate_bps: u32,
}

fn default_threshold() -> i64 {
    DEFAULT_FREE_SHIPPING_THRESHOLD.minor()
}

fn default_flat_shipping() -> i64 {
    DEFAULT_FLAT_SHIPPING.minor()
}

fn default_tax_bps() -> u32 {
    DEFAULT_TAX_RATE.bps()
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            free_shipping_threshold_minor: default_threshold(),
            flat_shipping_minor: default_flat_shipping(),
            tax_rate_bps: default_tax_bps(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Simulated payment processing time.
    #[serde(default = "default_processing_delay")]
    pub processing_delay_ms: u64,
}

fn default_processing_delay() -> u64 {
    2000
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            processing_delay_ms: default_processing_delay(),
        }
    }
}

// =============================================================================
// Storefront Config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl StorefrontConfig {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// `config_path` wins over `FURNISH_CONFIG`, which wins over the
    /// platform config directory. A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Like [`load`](Self::load), but falls back to defaults on any error.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "bind_addr '{}' is not a socket address",
                self.server.bind_addr
            )));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name cannot be empty".to_string()));
        }

        if self.store.currency_decimals > 4 {
            return Err(ConfigError::Invalid(
                "store.currency_decimals must be between 0 and 4".to_string(),
            ));
        }

        let pricing = &self.pricing;
        if pricing.free_shipping_threshold_minor < 0 || pricing.flat_shipping_minor < 0 {
            return Err(ConfigError::Invalid(
                "pricing amounts cannot be negative".to_string(),
            ));
        }

        if pricing.tax_rate_bps > 10_000 {
            return Err(ConfigError::Invalid(
                "pricing.tax_rate_bps cannot exceed 10000 (100%)".to_string(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("FURNISH_BIND_ADDR") {
            debug!(bind_addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Ok(path) = std::env::var("FURNISH_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(name) = std::env::var("FURNISH_STORE_NAME") {
            self.store.name = name;
        }

        // Percent, e.g. "18" or "12.5"
        if let Ok(rate) = std::env::var("FURNISH_TAX_RATE") {
            match rate.parse::<f64>() {
                Ok(pct) if pct >= 0.0 => {
                    debug!(rate = pct, "Overriding tax rate from environment");
                    self.pricing.tax_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(rate = %rate, "Ignoring unparseable FURNISH_TAX_RATE"),
            }
        }

        // Whole or decimal rupees, e.g. "2000" or "1999.50"
        if let Ok(raw) = std::env::var("FURNISH_FREE_SHIPPING_THRESHOLD") {
            match Money::parse_major(&raw) {
                Some(amount) => self.pricing.free_shipping_threshold_minor = amount.minor(),
                None => warn!(value = %raw, "Ignoring unparseable FURNISH_FREE_SHIPPING_THRESHOLD"),
            }
        }

        if let Ok(raw) = std::env::var("FURNISH_FLAT_SHIPPING") {
            match Money::parse_major(&raw) {
                Some(amount) => self.pricing.flat_shipping_minor = amount.minor(),
                None => warn!(value = %raw, "Ignoring unparseable FURNISH_FLAT_SHIPPING"),
            }
        }

        if let Ok(raw) = std::env::var("FURNISH_CHECKOUT_DELAY_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => self.checkout.processing_delay_ms = ms,
                Err(_) => warn!(value = %raw, "Ignoring unparseable FURNISH_CHECKOUT_DELAY_MS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "furnish", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    /// The one pricing policy used by carts, checkout and order summaries.
    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            free_shipping_threshold: Money::from_minor(self.pricing.free_shipping_threshold_minor),
            flat_shipping: Money::from_minor(self.pricing.flat_shipping_minor),
            tax_rate: TaxRate::from_bps(self.pricing.tax_rate_bps),
        }
    }

    pub fn checkout_delay(&self) -> Duration {
        Duration::from_millis(self.checkout.processing_delay_ms)
    }

    /// Formats a minor-unit amount with the configured symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(197_000), "₹1970.00");
    /// ```
    pub fn format_currency(&self, minor: i64) -> String {
        let decimals = self.store.currency_decimals as u32;
        let divisor = 10_i64.pow(decimals);
        let whole = (minor / divisor).abs();
        let frac = (minor % divisor).abs();
        let sign = if minor < 0 { "-" } else { "" };

        if decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.store.currency_symbol,
                whole,
                frac,
                width = decimals as usize
            )
        } else {
            format!("{}{}{}", sign, self.store.currency_symbol, whole)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.store.currency_code, "INR");
        assert_eq!(config.checkout.processing_delay_ms, 2000);
        assert_eq!(config.pricing_policy(), PricingPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();
        config.server.bind_addr = "not an address".to_string();
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.pricing.tax_rate_bps = 12_000;
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.pricing.flat_shipping_minor = -1;
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [pricing]
            tax_rate_bps = 1200

            [checkout]
            processing_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.tax_rate_bps, 1200);
        assert_eq!(config.pricing.flat_shipping_minor, 20_000);
        assert_eq!(config.checkout_delay(), Duration::ZERO);
        assert_eq!(config.store.name, "Furnish");
    }

    #[test]
    fn test_toml_serialization() {
        let config = StorefrontConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[pricing]"));
        assert!(toml_str.contains("[checkout]"));
    }

    #[test]
    fn test_format_currency() {
        let config = StorefrontConfig::default();
        assert_eq!(config.format_currency(197_000), "₹1970.00");
        assert_eq!(config.format_currency(1), "₹0.01");
        assert_eq!(config.format_currency(0), "₹0.00");
        assert_eq!(config.format_currency(-1234), "-₹12.34");
    }

    #[test]
    fn test_format_currency_without_decimals() {
        let mut config = StorefrontConfig::default();
        config.store.currency_decimals = 0;
        config.store.currency_symbol = "¥".to_string();
        assert_eq!(config.format_currency(1500), "¥1500");
    }
}
