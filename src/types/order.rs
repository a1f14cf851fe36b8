//! Order types and fill-state classification

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Wire representation expected by the exchange
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

/// Execution completeness of an order
///
/// Always derived from the original and executed amounts; the exchange
/// never supplies it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FillState {
    Filled,
    PartiallyFilled,
    Pending,
}

impl FillState {
    /// Classify by exact decimal equality.
    ///
    /// executed == original is Filled, executed == 0 is Pending, anything
    /// in between is PartiallyFilled. Exact-match semantics, not
    /// tolerance-based.
    pub fn classify(original: Decimal, executed: Decimal) -> Self {
        if executed == original {
            FillState::Filled
        } else if executed == Decimal::ZERO {
            FillState::Pending
        } else {
            FillState::PartiallyFilled
        }
    }
}

/// Normalized view of an order returned by placement, status, or the
/// open-order list
///
/// Constructed fresh from each response and never mutated afterwards; the
/// only persistent identity is `order_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    /// Exchange-assigned order id
    pub order_id: String,
    /// Trading pair the order was placed on
    pub symbol: String,
    /// True for buy orders
    pub is_buy: bool,
    /// Original order quantity
    pub amount: Decimal,
    /// Quantity executed so far
    pub amount_filled: Decimal,
    /// Limit price
    pub price: Decimal,
    /// Average execution price over all fills
    pub average_price: Decimal,
    /// Derived execution completeness
    pub fill_state: FillState,
    /// Order creation time
    pub order_date: DateTime<Utc>,
    /// Informational text supplied by the exchange, if any
    #[serde(default)]
    pub message: String,
}
