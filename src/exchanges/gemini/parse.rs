//! Canonicalization of raw Gemini JSON into the normalized domain model
//!
//! Pure functions, no I/O. Responses deserialize into the `Raw*` structs
//! here and are then mapped into the strict types in `crate::types`. The
//! one place that still walks untyped JSON is `parse_volume`, whose
//! positional three-property rule has no fixed schema.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use crate::errors::{GeminiError, GeminiResult};
use crate::types::{
    BalanceMap, FillState, OrderBook, OrderBookLevel, OrderResult, Ticker, Trade, Volume,
};

/// Detect the exchange's error envelope.
///
/// A single-object response is an error when its `result` field is the
/// literal string `"error"`; the `reason` text is surfaced verbatim.
/// Arrays are list responses (balances, orders) and are never error
/// containers.
pub fn check_error(node: &Value) -> GeminiResult<()> {
    if node.is_array() {
        return Ok(());
    }

    if node.get("result").and_then(Value::as_str) == Some("error") {
        let reason = node
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        return Err(GeminiError::ExchangeError { message: reason });
    }

    Ok(())
}

/// Millisecond timestamp to an absolute instant; out-of-range values
/// degrade to the epoch
pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Decimal from a JSON string or number node, zero on anything else.
/// `Decimal::from_str` is culture-invariant; locale-sensitive parsing is
/// never used.
fn decimal_of(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap_or(Decimal::ZERO),
        Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Decompose the ticker's volume object positionally.
///
/// The object carries exactly three properties in declared order: the base
/// currency volume, the quote currency volume, and a millisecond
/// timestamp. Any other property count yields the all-zero `Volume`
/// (silent degradation, not an error) and callers must tolerate it.
pub fn parse_volume(node: &Value) -> Volume {
    let Some(obj) = node.as_object() else {
        return Volume::default();
    };
    if obj.len() != 3 {
        return Volume::default();
    }

    let entries: Vec<(&String, &Value)> = obj.iter().collect();

    let millis = entries[2]
        .1
        .as_i64()
        .or_else(|| entries[2].1.as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0);

    Volume {
        base_symbol: entries[0].0.clone(),
        base_volume: decimal_of(entries[0].1),
        converted_symbol: entries[1].0.clone(),
        converted_volume: decimal_of(entries[1].1),
        timestamp: from_millis(millis),
    }
}

/// `/v1/pubticker/{symbol}` response
#[derive(Debug, Clone, Deserialize)]
pub struct RawTicker {
    pub bid: Decimal,
    pub ask: Decimal,
    pub last: Decimal,
    #[serde(default)]
    pub volume: Value,
}

pub fn parse_ticker(raw: &RawTicker) -> Ticker {
    Ticker {
        ask: raw.ask,
        bid: raw.bid,
        last: raw.last,
        volume: parse_volume(&raw.volume),
    }
}

/// One record from `/v1/trades/{symbol}`
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrade {
    pub timestampms: i64,
    pub tid: i64,
    pub price: Decimal,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub side: String,
}

/// Side is literal, case-sensitive equality against `"buy"`, as received
pub fn parse_trade(raw: &RawTrade) -> Trade {
    Trade {
        id: raw.tid,
        timestamp: from_millis(raw.timestampms),
        price: raw.price,
        amount: raw.amount,
        is_buy: raw.side == "buy",
    }
}

/// One price level from `/v1/book/{symbol}`; the wire entry also carries a
/// timestamp, which is not part of the normalized level
#[derive(Debug, Clone, Deserialize)]
pub struct RawBookLevel {
    pub price: Decimal,
    pub amount: Decimal,
}

/// `/v1/book/{symbol}` response
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderBook {
    #[serde(default)]
    pub bids: Vec<RawBookLevel>,
    #[serde(default)]
    pub asks: Vec<RawBookLevel>,
}

/// Side order stays exactly as the exchange returned it
pub fn parse_order_book(raw: &RawOrderBook) -> OrderBook {
    let level = |l: &RawBookLevel| OrderBookLevel {
        price: l.price,
        amount: l.amount,
    };

    OrderBook {
        bids: raw.bids.iter().map(level).collect(),
        asks: raw.asks.iter().map(level).collect(),
    }
}

/// Order shape shared by `/v1/order/new`, `/v1/order/status`,
/// `/v1/order/cancel` and the `/v1/orders` list
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrder {
    pub order_id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub side: String,
    #[serde(default)]
    pub timestampms: i64,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub avg_execution_price: Decimal,
    #[serde(default)]
    pub original_amount: Decimal,
    #[serde(default)]
    pub executed_amount: Decimal,
    #[serde(default)]
    pub message: Option<String>,
}

/// Map an order response into the normalized result.
///
/// The fill state is always derived here from the original and executed
/// amounts by exact decimal equality; the exchange never supplies it.
pub fn parse_order(raw: &RawOrder) -> OrderResult {
    OrderResult {
        order_id: raw.order_id.clone(),
        symbol: raw.symbol.clone(),
        is_buy: raw.side == "buy",
        amount: raw.original_amount,
        amount_filled: raw.executed_amount,
        price: raw.price,
        average_price: raw.avg_execution_price,
        fill_state: FillState::classify(raw.original_amount, raw.executed_amount),
        order_date: from_millis(raw.timestampms),
        message: raw.message.clone().unwrap_or_default(),
    }
}

/// One record from `/v1/balances`
#[derive(Debug, Clone, Deserialize)]
pub struct RawBalance {
    pub currency: String,
    #[serde(default)]
    pub available: Decimal,
}

/// Zero-balance currencies are dropped; keys are upper-cased
pub fn parse_balances(raw: &[RawBalance]) -> BalanceMap {
    let mut balances = BalanceMap::new();
    for entry in raw {
        balances.insert(&entry.currency, entry.available);
    }
    balances
}
