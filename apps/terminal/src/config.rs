//! # Terminal Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CAFE_STORE_NAME, CAFE_CURRENCY_SYMBOL, CAFE_DATE_FORMAT,           │
//! │     CAFE_UTC_OFFSET_MINUTES, CAFE_SEED_MENU                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, else CAFE_CONFIG, else                            │
//! │     ~/.config/cafe-pos/cafe.toml (Linux)                               │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "CAFETERIA DO CENTRO"
//! seed_menu = true
//! date_format = "%d/%m/%Y %H:%M"
//! utc_offset_minutes = -180
//!
//! [currency]
//! symbol = "R$"
//! decimal_separator = ","
//! thousands_separator = "."
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cafe_core::receipt::{is_valid_date_format, DEFAULT_DATE_FORMAT};
use cafe_core::{CurrencyFormat, ReceiptOptions};

/// Largest offset chrono accepts, in minutes (just under a day).
const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Terminal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Title of the main menu.
    pub store_name: String,

    /// Start with the default café menu instead of an empty catalog.
    pub seed_menu: bool,

    /// Currency convention for prices, totals and receipts.
    pub currency: CurrencyFormat,

    /// `strftime` pattern for the receipt date.
    pub date_format: String,

    /// Local offset from UTC in minutes.
    pub utc_offset_minutes: i32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            store_name: "SISTEMA DA CAFETERIA".to_string(),
            seed_menu: true,
            currency: CurrencyFormat::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl TerminalConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("CAFE_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `CAFE_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("CAFE_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = lookup("CAFE_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(pattern) = lookup("CAFE_DATE_FORMAT") {
            self.date_format = pattern;
        }

        if let Some(offset) = lookup("CAFE_UTC_OFFSET_MINUTES") {
            match offset.trim().parse() {
                Ok(minutes) => self.utc_offset_minutes = minutes,
                Err(_) => warn!(value = %offset, "Ignoring invalid CAFE_UTC_OFFSET_MINUTES"),
            }
        }

        if let Some(seed) = lookup("CAFE_SEED_MENU") {
            match seed.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "sim" => self.seed_menu = true,
                "0" | "false" | "no" | "nao" | "não" => self.seed_menu = false,
                _ => warn!(value = %seed, "Ignoring invalid CAFE_SEED_MENU"),
            }
        }
    }

    /// Checks the loaded values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.decimal_separator.is_empty() {
            return Err(ConfigError::InvalidValue(
                "currency.decimal_separator must not be empty".to_string(),
            ));
        }

        if !is_valid_date_format(&self.date_format) {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }

        if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(ConfigError::InvalidValue(format!(
                "utc_offset_minutes must be between -{max} and {max}",
                max = MAX_UTC_OFFSET_MINUTES
            )));
        }

        Ok(())
    }

    /// Receipt options derived from this configuration (no customer).
    pub fn receipt_options(&self) -> ReceiptOptions {
        ReceiptOptions {
            customer_name: None,
            currency: self.currency.clone(),
            date_format: self.date_format.clone(),
            utc_offset_minutes: self.utc_offset_minutes,
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "cafe", "pos").map(|dirs| dirs.config_dir().join("cafe.toml"))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
