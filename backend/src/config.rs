//! Configuration management for the Microgreen Grower Portal
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with MGP_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Inventory ledger configuration
    pub inventory: InventoryConfig,

    /// Order engine configuration
    pub orders: OrdersConfig,

    /// Forecasting configuration
    pub forecast: ForecastConfig,

    /// SMTP configuration for alert emails
    pub smtp: SmtpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InventoryConfig {
    /// Tray count below which a negative adjustment raises a low-stock alert
    /// (strictly below; landing exactly on the threshold does not alert)
    pub low_stock_threshold: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrdersConfig {
    /// Unit price applied when an order line does not state one
    pub default_price_per_tray: Decimal,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Demand oracle endpoint; empty disables the oracle and the cache
    /// serves the historical-mean fallback
    pub oracle_endpoint: String,

    /// How many days of completed-order history feed the oracle
    pub lookback_days: i64,
}

impl ForecastConfig {
    pub fn oracle_configured(&self) -> bool {
        !self.oracle_endpoint.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub email_from: String,
    pub email_to: String,
}

impl SmtpConfig {
    /// Email is skipped entirely unless every field is filled in.
    pub fn is_configured(&self) -> bool {
        !(self.host.is_empty()
            || self.username.is_empty()
            || self.password.is_empty()
            || self.email_from.is_empty()
            || self.email_to.is_empty())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("MGP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("inventory.low_stock_threshold", 5)?
            .set_default("orders.default_price_per_tray", "10.0")?
            .set_default("forecast.oracle_endpoint", "")?
            .set_default("forecast.lookback_days", 60)?
            .set_default("smtp.host", "")?
            .set_default("smtp.port", 587)?
            .set_default("smtp.username", "")?
            .set_default("smtp.password", "")?
            .set_default("smtp.email_from", "")?
            .set_default("smtp.email_to", "")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (MGP_ prefix)
            .add_source(
                Environment::with_prefix("MGP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig {
                port: 8000,
                host: "0.0.0.0".to_string(),
            },
            inventory: InventoryConfig {
                low_stock_threshold: 5,
            },
            orders: OrdersConfig {
                default_price_per_tray: Decimal::new(10, 0),
            },
            forecast: ForecastConfig {
                oracle_endpoint: String::new(),
                lookback_days: 60,
            },
            smtp: SmtpConfig {
                host: String::new(),
                port: 587,
                username: String::new(),
                password: String::new(),
                email_from: String::new(),
                email_to: String::new(),
            },
        }
    }
}
