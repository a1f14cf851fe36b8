//! HTTP client and related utilities

mod config;
mod http;
mod rate_limiter;

pub use config::ExchangeConfig;
pub use http::HttpClient;
pub use rate_limiter::{IntervalPacer, NoopPacer, Pacer, RateLimiter};
