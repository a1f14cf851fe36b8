//! Gemini exchange implementation
//!
//! REST connector exposing Gemini through the normalized domain model:
//! public market data, account balances, and the order lifecycle. Private
//! endpoints authenticate with the header-payload signing scheme in
//! [`sign`]; trade history is retrieved through the cursor paginator in
//! [`paginator`].

pub mod paginator;
pub mod parse;
pub mod sign;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::client::{ExchangeConfig, HttpClient, IntervalPacer, RateLimiter};
use crate::errors::{GeminiError, GeminiResult};
use crate::types::{BalanceMap, OrderBook, OrderResult, OrderSide, OrderType, Ticker, Trade};

pub use paginator::{TradeHistoryPaginator, TradePageFetcher};
pub use sign::{Credentials, SignedHeaders};

/// Gemini exchange connector
pub struct Gemini {
    client: HttpClient,
    rate_limiter: RateLimiter,
    credentials: Option<Credentials>,
}

impl Gemini {
    const BASE_URL: &'static str = "https://api.gemini.com";
    const SANDBOX_URL: &'static str = "https://api.sandbox.gemini.com";

    /// Page size for historical trade requests
    const TRADE_PAGE_LIMIT: usize = 100;
    /// Courtesy delay between trade history pages
    const TRADE_PAGE_DELAY_MS: u64 = 1000;

    /// Create a new Gemini instance
    pub fn new(config: ExchangeConfig) -> GeminiResult<Self> {
        let base_url = if config.is_sandbox() {
            Self::SANDBOX_URL
        } else {
            Self::BASE_URL
        };

        let client = HttpClient::new(base_url, &config)?;
        let rate_limiter = RateLimiter::new(config.rate_limit_ms());
        let credentials = Credentials::from_config(&config);

        Ok(Self {
            client,
            rate_limiter,
            credentials,
        })
    }

    pub fn name(&self) -> &str {
        "Gemini"
    }

    /// Convert a trading pair to the exchange's market id
    /// (BTC/USD -> btcusd)
    pub fn market_id(symbol: &str) -> String {
        symbol.to_lowercase().replace(['/', '-', '_'], "")
    }

    fn nonce() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Public API call; the error envelope is checked before any typed
    /// deserialization
    async fn public_get(
        &self,
        path: &str,
        params: Option<HashMap<String, String>>,
    ) -> GeminiResult<Value> {
        self.rate_limiter.throttle().await;
        let node = self.client.get(path, params).await?;
        parse::check_error(&node)?;
        Ok(node)
    }

    /// Private API call: signing is an explicit property of this entry
    /// point, never inferred from the payload shape. Missing credentials
    /// fail here, before any network I/O.
    async fn private_post(
        &self,
        path: &str,
        mut payload: Map<String, Value>,
    ) -> GeminiResult<Value> {
        let credentials =
            self.credentials
                .as_ref()
                .ok_or_else(|| GeminiError::AuthenticationError {
                    message: "API key and secret required".into(),
                })?;

        payload.insert("nonce".into(), json!(Self::nonce()));
        let headers = credentials.sign(path, payload)?;

        self.rate_limiter.throttle().await;
        let node = self.client.post_headers_only(path, headers.into_header_map()).await?;
        parse::check_error(&node)?;
        Ok(node)
    }

    // === Public market data ===

    /// List tradable market ids
    pub async fn fetch_markets(&self) -> GeminiResult<Vec<String>> {
        let node = self.public_get("/v1/symbols", None).await?;
        Ok(serde_json::from_value(node)?)
    }

    /// Current quote for a symbol
    pub async fn fetch_ticker(&self, symbol: &str) -> GeminiResult<Ticker> {
        let path = format!("/v1/pubticker/{}", Self::market_id(symbol));
        let node = self.public_get(&path, None).await?;
        let raw: parse::RawTicker = serde_json::from_value(node)?;
        Ok(parse::parse_ticker(&raw))
    }

    /// Order book snapshot; `limit` caps the number of levels per side
    pub async fn fetch_order_book(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> GeminiResult<OrderBook> {
        let path = format!("/v1/book/{}", Self::market_id(symbol));

        let params = limit.map(|n| {
            let mut params = HashMap::new();
            params.insert("limit_bids".into(), n.to_string());
            params.insert("limit_asks".into(), n.to_string());
            params
        });

        let node = self.public_get(&path, params).await?;
        let raw: parse::RawOrderBook = serde_json::from_value(node)?;
        Ok(parse::parse_order_book(&raw))
    }

    /// Stream historical trades to `consumer`, one canonicalized page at a
    /// time, oldest-first within each page.
    ///
    /// With a starting instant the paginator walks forward through history
    /// page by page; without one a single unbounded fetch is made. The
    /// consumer returns `false` to stop early.
    pub async fn fetch_trades<C>(
        &self,
        symbol: &str,
        since: Option<DateTime<Utc>>,
        consumer: C,
    ) -> GeminiResult<()>
    where
        C: FnMut(Vec<Trade>) -> bool + Send,
    {
        let pacer = IntervalPacer::new(Duration::from_millis(Self::TRADE_PAGE_DELAY_MS));
        let mut paginator = TradeHistoryPaginator::new(self, &pacer, Self::TRADE_PAGE_LIMIT);
        paginator.run(&Self::market_id(symbol), since, consumer).await
    }

    // === Account / trading ===

    /// Available balance per currency; zero balances are dropped
    pub async fn fetch_balance(&self) -> GeminiResult<BalanceMap> {
        let node = self.private_post("/v1/balances", Map::new()).await?;
        let raw: Vec<parse::RawBalance> = serde_json::from_value(node)?;
        Ok(parse::parse_balances(&raw))
    }

    /// Place an order.
    ///
    /// The exchange fills pure market orders only through its own
    /// immediate-or-cancel variants, which this connector does not place on
    /// the caller's behalf; market orders are rejected here before any
    /// network call.
    pub async fn create_order(
        &self,
        symbol: &str,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> GeminiResult<OrderResult> {
        if order_type == OrderType::Market {
            return Err(GeminiError::NotSupported {
                feature: "market orders".into(),
            });
        }

        let price = price.ok_or_else(|| GeminiError::InvalidOrder {
            message: "limit orders require a price".into(),
        })?;

        let mut payload = Map::new();
        payload.insert("symbol".into(), json!(Self::market_id(symbol)));
        payload.insert("amount".into(), json!(amount.to_string()));
        payload.insert("price".into(), json!(price.to_string()));
        payload.insert("side".into(), json!(side.as_str()));
        payload.insert("type".into(), json!("exchange limit"));

        let node = self.private_post("/v1/order/new", payload).await?;
        let raw: parse::RawOrder = serde_json::from_value(node)?;
        Ok(parse::parse_order(&raw))
    }

    /// Status of a single order
    pub async fn fetch_order(&self, order_id: &str) -> GeminiResult<OrderResult> {
        let mut payload = Map::new();
        payload.insert("order_id".into(), json!(order_id));

        let node = self.private_post("/v1/order/status", payload).await?;
        let raw: parse::RawOrder = serde_json::from_value(node)?;
        Ok(parse::parse_order(&raw))
    }

    /// All live orders for the account
    pub async fn fetch_open_orders(&self) -> GeminiResult<Vec<OrderResult>> {
        let node = self.private_post("/v1/orders", Map::new()).await?;
        let raw: Vec<parse::RawOrder> = serde_json::from_value(node)?;
        Ok(raw.iter().map(parse::parse_order).collect())
    }

    /// Cancel an order; returns its post-cancellation state
    pub async fn cancel_order(&self, order_id: &str) -> GeminiResult<OrderResult> {
        let mut payload = Map::new();
        payload.insert("order_id".into(), json!(order_id));

        let node = self.private_post("/v1/order/cancel", payload).await?;
        let raw: parse::RawOrder = serde_json::from_value(node)?;
        Ok(parse::parse_order(&raw))
    }
}

#[async_trait]
impl TradePageFetcher for Gemini {
    async fn fetch_page(
        &self,
        symbol: &str,
        cursor: Option<DateTime<Utc>>,
        limit: usize,
    ) -> GeminiResult<Vec<parse::RawTrade>> {
        let path = format!("/v1/trades/{symbol}");

        let mut params = HashMap::new();
        params.insert("limit_trades".into(), limit.to_string());
        if let Some(cursor) = cursor {
            params.insert("timestamp".into(), cursor.timestamp_millis().to_string());
        }

        let node = self.public_get(&path, Some(params)).await?;
        Ok(serde_json::from_value(node)?)
    }
}
