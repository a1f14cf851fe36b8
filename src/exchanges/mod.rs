//! Exchange implementations

pub mod gemini;

pub use gemini::{Credentials, Gemini, SignedHeaders, TradeHistoryPaginator, TradePageFetcher};
