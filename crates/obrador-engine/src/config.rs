//! # Engine Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`OBRADOR_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization; the facade shares it
//! through an `Arc`.

use chrono::{FixedOffset, Offset, Utc};
use obrador_core::{Money, DEFAULT_LOW_STOCK_THRESHOLD};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Business name (shown in reports)
    pub business_name: String,

    /// Quantity at or below which a material counts as low stock
    pub low_stock_threshold: Decimal,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u32,

    /// Offset of the business's local time from UTC, in minutes.
    /// Decides which calendar day and month a sale belongs to.
    pub utc_offset_minutes: i32,
}

impl Default for EngineConfig {
    /// ## Default Values
    /// - Business: "Obrador"
    /// - Low stock: 5
    /// - Currency: $ with 2 decimals
    /// - Calendar: UTC
    fn default() -> Self {
        EngineConfig {
            business_name: "Obrador".to_string(),
            low_stock_threshold: Decimal::from(DEFAULT_LOW_STOCK_THRESHOLD),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            utc_offset_minutes: 0,
        }
    }
}

impl EngineConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `OBRADOR_BUSINESS_NAME`: Override business name
    /// - `OBRADOR_LOW_STOCK_THRESHOLD`: Low-stock threshold (e.g., "2.5")
    /// - `OBRADOR_CURRENCY_SYMBOL`: Currency symbol (e.g., "MX$")
    /// - `OBRADOR_UTC_OFFSET_MINUTES`: Calendar offset (e.g., "-360")
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = EngineConfig::default();

        if let Ok(name) = std::env::var("OBRADOR_BUSINESS_NAME") {
            config.business_name = name;
        }

        if let Ok(raw) = std::env::var("OBRADOR_LOW_STOCK_THRESHOLD") {
            match raw.trim().parse::<Decimal>() {
                Ok(threshold) if threshold >= Decimal::ZERO => config.low_stock_threshold = threshold,
                _ => warn!(value = %raw, "Ignoring invalid OBRADOR_LOW_STOCK_THRESHOLD"),
            }
        }

        if let Ok(symbol) = std::env::var("OBRADOR_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Ok(raw) = std::env::var("OBRADOR_UTC_OFFSET_MINUTES") {
            match raw.trim().parse::<i32>() {
                Ok(minutes) if offset_from_minutes(minutes).is_some() => {
                    config.utc_offset_minutes = minutes
                }
                _ => warn!(value = %raw, "Ignoring invalid OBRADOR_UTC_OFFSET_MINUTES"),
            }
        }

        config
    }

    /// The calendar offset as a chrono `FixedOffset`.
    ///
    /// Falls back to UTC when the configured offset is out of range
    /// (beyond ±24h).
    pub fn utc_offset(&self) -> FixedOffset {
        offset_from_minutes(self.utc_offset_minutes).unwrap_or_else(|| {
            warn!(minutes = self.utc_offset_minutes, "UTC offset out of range, using UTC");
            Utc.fix()
        })
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use obrador_core::Money;
    /// use obrador_engine::EngineConfig;
    ///
    /// let config = EngineConfig::default();
    /// assert_eq!(config.format_currency(Money::from_units(450)), "$450.00");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let rounded = amount.rounded(self.currency_decimals).amount();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        format!(
            "{}{}{:.width$}",
            sign,
            self.currency_symbol,
            rounded.abs(),
            width = self.currency_decimals as usize
        )
    }
}

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_positive() {
        let config = EngineConfig::default();
        assert_eq!(config.format_currency(Money::new(dec!(12.34))), "$12.34");
        assert_eq!(config.format_currency(Money::from_units(1)), "$1.00");
        assert_eq!(config.format_currency(Money::new(dec!(0.01))), "$0.01");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = EngineConfig::default();
        assert_eq!(config.format_currency(Money::new(dec!(-12.34))), "-$12.34");
    }

    #[test]
    fn test_format_currency_rounds_half_even() {
        let config = EngineConfig::default();
        assert_eq!(config.format_currency(Money::new(dec!(0.125))), "$0.12");
        assert_eq!(config.format_currency(Money::new(dec!(0.135))), "$0.14");
    }

    #[test]
    fn test_format_currency_custom_symbol_and_decimals() {
        let config = EngineConfig {
            currency_symbol: "MX$".to_string(),
            currency_decimals: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.format_currency(Money::new(dec!(449.6))), "MX$450");
    }

    #[test]
    fn test_utc_offset() {
        let config = EngineConfig {
            utc_offset_minutes: -360,
            ..EngineConfig::default()
        };
        assert_eq!(config.utc_offset().local_minus_utc(), -6 * 3600);

        let config = EngineConfig {
            utc_offset_minutes: 100_000,
            ..EngineConfig::default()
        };
        assert_eq!(config.utc_offset().local_minus_utc(), 0);
    }
}
