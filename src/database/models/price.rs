use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::database::cache::{parse_timestamp, LAST_REFRESHED_FIELD};

/// Cached prices of one token, keyed by currency code.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct TokenPrice {
    pub prices: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_refreshed: Option<i64>,
}

impl TokenPrice {
    /// Read a per-id sub-object of the `tokens-prices` entry.
    ///
    /// Non-numeric currency values are skipped. Returns `None` when `value`
    /// is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut price = TokenPrice::default();
        for (currency, amount) in object {
            if currency == LAST_REFRESHED_FIELD {
                price.last_refreshed = parse_timestamp(amount);
            } else if let Some(amount) = amount.as_f64() {
                price.prices.insert(currency.clone(), amount);
            }
        }
        Some(price)
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        self.prices.get(currency).copied()
    }
}
