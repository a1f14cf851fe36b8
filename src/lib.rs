//! Gemini exchange REST connector
//!
//! Exposes Gemini's REST API through a normalized, exchange-agnostic
//! interface: symbols, tickers, order books, historical trades, balances,
//! and the order lifecycle.

pub mod client;
pub mod errors;
pub mod exchanges;
pub mod types;

// Re-exports
pub use client::{ExchangeConfig, HttpClient, IntervalPacer, NoopPacer, Pacer, RateLimiter};
pub use errors::{GeminiError, GeminiResult};
pub use exchanges::{Credentials, Gemini, SignedHeaders, TradeHistoryPaginator, TradePageFetcher};
