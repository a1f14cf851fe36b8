//! Order book types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single price level on one side of the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// Level price
    pub price: Decimal,
    /// Quantity resting at this price
    pub amount: Decimal,
}

/// Order book snapshot
///
/// Levels keep the order the exchange returned; no re-sorting is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
}

impl OrderBook {
    /// Best bid, if any
    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    /// Best ask, if any
    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }
}
