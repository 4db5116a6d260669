//! Configuration module
//!
//! Application settings are read from a TOML file, by default
//! `~/.config/stayhaven/config.toml` (override with `STAYHAVEN_CONFIG`).
//! Missing sections fall back to defaults so a partial file is valid.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::PricingRates;
use crate::domain::property::PropertySnapshot;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stayhaven")
        .join("config.toml")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    /// Seed catalog of bookable properties
    #[serde(default)]
    pub properties: Vec<PropertySeed>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "sqlite://./stayhaven.db?mode=rwc".to_string()
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Service fee as a fraction of the subtotal, e.g. "0.03"
    #[serde(default = "default_service_fee_rate")]
    pub service_fee_rate: Decimal,
    /// Tax as a fraction of subtotal plus fees, e.g. "0.10"
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
}

fn default_service_fee_rate() -> Decimal {
    dec!(0.03)
}

fn default_tax_rate() -> Decimal {
    dec!(0.10)
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            service_fee_rate: default_service_fee_rate(),
            tax_rate: default_tax_rate(),
        }
    }
}

impl From<&PricingConfig> for PricingRates {
    fn from(cfg: &PricingConfig) -> Self {
        PricingRates {
            service_fee_rate: cfg.service_fee_rate,
            tax_rate: cfg.tax_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Per-call deadline for payment processor requests
    #[serde(default = "default_payment_timeout")]
    pub timeout_secs: u64,
}

fn default_payment_timeout() -> u64 {
    10
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_payment_timeout(),
        }
    }
}

/// One bookable property from the `[[properties]]` config tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySeed {
    pub id: String,
    pub host_id: String,
    pub price_per_night: Decimal,
    #[serde(default)]
    pub cleaning_fee: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_max_guests")]
    pub max_guests: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub instant_book: bool,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_max_guests() -> u32 {
    8
}

fn default_true() -> bool {
    true
}

impl From<&PropertySeed> for PropertySnapshot {
    fn from(seed: &PropertySeed) -> Self {
        PropertySnapshot {
            id: seed.id.clone(),
            host_id: seed.host_id.clone(),
            price_per_night: seed.price_per_night,
            cleaning_fee: seed.cleaning_fee,
            currency: seed.currency.clone(),
            max_guests: seed.max_guests,
            is_active: seed.is_active,
            instant_book: seed.instant_book,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.pricing.service_fee_rate, dec!(0.03));
        assert_eq!(cfg.pricing.tax_rate, dec!(0.10));
        assert_eq!(cfg.payment.timeout_secs, 10);
        assert!(cfg.properties.is_empty());
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [pricing]
            tax_rate = "0.08"

            [[properties]]
            id = "prop-1"
            host_id = "host-1"
            price_per_night = "120.00"
            cleaning_fee = "40.00"
            instant_book = true
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.pricing.tax_rate, dec!(0.08));
        assert_eq!(cfg.pricing.service_fee_rate, dec!(0.03));

        assert_eq!(cfg.properties.len(), 1);
        let snapshot = PropertySnapshot::from(&cfg.properties[0]);
        assert_eq!(snapshot.price_per_night, dec!(120.00));
        assert_eq!(snapshot.currency, "USD");
        assert!(snapshot.instant_book);
        assert!(snapshot.is_active);
    }

    #[test]
    fn server_address_joins_host_and_port() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.address(), "0.0.0.0:8080");
    }
}
