//! Trade type

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single executed trade from the public history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Exchange-assigned trade id
    pub id: i64,
    /// Execution time
    pub timestamp: DateTime<Utc>,
    /// Execution price
    pub price: Decimal,
    /// Executed quantity
    pub amount: Decimal,
    /// True when the taker side was a buy
    pub is_buy: bool,
}

impl Trade {
    /// Trade notional (price * amount)
    pub fn cost(&self) -> Decimal {
        self.price * self.amount
    }
}
