//! Ticker and volume types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time quote for a trading pair
///
/// Created per request, immutable, discarded by the caller after use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    /// Lowest ask price
    pub ask: Decimal,
    /// Highest bid price
    pub bid: Decimal,
    /// Last traded price
    pub last: Decimal,
    /// 24h volume breakdown
    pub volume: Volume,
}

/// 24h traded volume in base and quote (converted) currency
///
/// Decomposed positionally from the exchange's three-property volume
/// object; a malformed shape degrades to the all-zero value instead of an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Base currency code
    pub base_symbol: String,
    /// Volume in base currency
    pub base_volume: Decimal,
    /// Quote currency code
    pub converted_symbol: String,
    /// Volume in quote currency
    pub converted_volume: Decimal,
    /// End of the measured 24h window
    pub timestamp: DateTime<Utc>,
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            base_symbol: String::new(),
            base_volume: Decimal::ZERO,
            converted_symbol: String::new(),
            converted_volume: Decimal::ZERO,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl Volume {
    /// True when this is the degraded zero value
    pub fn is_empty(&self) -> bool {
        self.base_symbol.is_empty() && self.converted_symbol.is_empty()
    }
}
