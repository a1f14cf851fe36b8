//! Account balance map

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Available balance per currency
///
/// Keys are upper-cased currency codes; zero-balance currencies are never
/// inserted, so they are invisible to callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceMap {
    currencies: HashMap<String, Decimal>,
}

impl BalanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a balance; amounts <= 0 are dropped
    pub fn insert(&mut self, currency: impl AsRef<str>, available: Decimal) {
        if available > Decimal::ZERO {
            self.currencies
                .insert(currency.as_ref().to_uppercase(), available);
        }
    }

    /// Available amount for a currency (case-insensitive lookup)
    pub fn get(&self, currency: &str) -> Option<Decimal> {
        self.currencies.get(&currency.to_uppercase()).copied()
    }

    /// Number of currencies with a positive balance
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// Iterate over (currency, available) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.currencies.iter()
    }
}
