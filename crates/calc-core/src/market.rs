//! Market values as consumed by the engine.

use crate::ids::ItemId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Operator-supplied coin values per item. Session-scoped; never written back to market data.
pub type PriceOverrides = BTreeMap<ItemId, Decimal>;

/// Deserialize a market price where any negative value (the feed uses -1) means "unavailable".
pub fn price_or_unavailable<'de, D>(d: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Decimal>::deserialize(d)?;
    Ok(raw.filter(|p| !p.is_sign_negative()))
}

/// Ask/bid/vendor prices of one item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketValue {
    #[serde(default, deserialize_with = "price_or_unavailable")]
    pub ask: Option<Decimal>,
    #[serde(default, deserialize_with = "price_or_unavailable")]
    pub bid: Option<Decimal>,
    #[serde(default)]
    pub sell_price: Decimal,
}

impl MarketValue {
    /// Value with no order book, only a vendor price.
    pub fn vendor_only(sell_price: Decimal) -> Self {
        Self {
            ask: None,
            bid: None,
            sell_price,
        }
    }
}

/// Market values keyed by item. An empty book stands for "no market data".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketBook {
    pub values: BTreeMap<ItemId, MarketValue>,
    /// When the underlying market snapshot was taken, if known.
    pub as_of: Option<DateTime<Utc>>,
}

impl MarketBook {
    pub fn get(&self, item: &ItemId) -> Option<&MarketValue> {
        self.values.get(item)
    }

    pub fn insert(&mut self, item: ItemId, value: MarketValue) {
        self.values.insert(item, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
