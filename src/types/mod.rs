//! Normalized domain model

mod balance;
mod order;
mod orderbook;
mod ticker;
mod trade;

pub use balance::BalanceMap;
pub use order::{FillState, OrderResult, OrderSide, OrderType};
pub use orderbook::{OrderBook, OrderBookLevel};
pub use ticker::{Ticker, Volume};
pub use trade::Trade;
