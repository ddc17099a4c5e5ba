//! Registry Configuration
//!
//! Auction floor, stale window, name rules, key prefix and sale fee.
//! Loaded from TOML or built in code; always validated before use.

use std::path::Path;

use lib_types::{Amount, Bps, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};

/// Configuration validation error
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] toml::de::Error),
}

/// Tunables for the reservation registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    // =========================================================================
    // Auction
    // =========================================================================
    /// Minimum bid in native base units
    pub min_bid: u64,
    /// Seconds after which a bid may be withdrawn by its bidder
    pub stale_bid_window_secs: u64,
    /// Share of each sale retained by the treasury (10000 = 100%)
    pub sale_fee_bps: Bps,

    // =========================================================================
    // Names
    // =========================================================================
    /// Minimum name length in bytes
    pub min_name_len: usize,
    /// Maximum name length in bytes
    pub max_name_len: usize,
    /// Reject names that are not valid UTF-8
    pub require_utf8_names: bool,

    // =========================================================================
    // Keys
    // =========================================================================
    /// Textual prefix of registration keys
    pub key_prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_bid: 10_000_000_000_000_000, // 0.01 native
            stale_bid_window_secs: 24 * 60 * 60,
            sale_fee_bps: 1_000, // 10%

            min_name_len: 3,
            max_name_len: 32,
            require_utf8_names: true,

            key_prefix: "EOS".to_string(),
        }
    }
}

impl RegistryConfig {
    /// Short stale window for tests; everything else at defaults
    pub fn for_testing() -> Self {
        Self {
            stale_bid_window_secs: 60,
            ..Self::default()
        }
    }

    /// Parse from a TOML document. Missing fields take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(
            "Loaded registry config from {:?} (min_bid={}, stale_window={}s, fee={}bps)",
            path.as_ref(),
            config.min_bid,
            config.stale_bid_window_secs,
            config.sale_fee_bps
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_bid == 0 {
            return Err(invalid("min_bid", "must be greater than zero"));
        }
        if Amount::from(self.sale_fee_bps) >= BPS_DENOMINATOR {
            return Err(invalid(
                "sale_fee_bps",
                format!("{} must be below {}", self.sale_fee_bps, BPS_DENOMINATOR),
            ));
        }
        if self.min_name_len == 0 {
            return Err(invalid("min_name_len", "must be at least 1"));
        }
        if self.max_name_len < self.min_name_len {
            return Err(invalid(
                "max_name_len",
                format!(
                    "{} is below min_name_len {}",
                    self.max_name_len, self.min_name_len
                ),
            ));
        }
        if self.key_prefix.is_empty() || !self.key_prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("key_prefix", "must be non-empty ASCII alphanumeric"));
        }
        Ok(())
    }

    /// Minimum bid as an [`Amount`]
    pub fn min_bid_amount(&self) -> Amount {
        Amount::from(self.min_bid)
    }

    /// Fee retained on a sale at `price`, rounded down
    pub fn sale_fee(&self, price: Amount) -> Amount {
        price.saturating_mul(Amount::from(self.sale_fee_bps)) / BPS_DENOMINATOR
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}
