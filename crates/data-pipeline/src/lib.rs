#![deny(warnings)]

//! Reference and market data adapters.
//!
//! Parses the game's client-data JSON into [`ReferenceData`] (validated before
//! use) and the marketplace JSON, keyed by item display name, into a
//! [`MarketBook`] keyed by item id.

use anyhow::{Context, Result};
use calc_core::{
    price_or_unavailable, validate_reference_data, ItemId, MarketBook, MarketValue, ReferenceData,
};
use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Parse and validate client data.
pub fn parse_reference_data(json: &str) -> Result<ReferenceData> {
    let data: ReferenceData =
        serde_json::from_str(json).context("parsing reference data JSON")?;
    validate_reference_data(&data).context("validating reference data")?;
    info!(
        actions = data.actions.len(),
        items = data.items.len(),
        monsters = data.monsters.len(),
        "reference data loaded"
    );
    Ok(data)
}

pub fn load_reference_data(path: impl AsRef<Path>) -> Result<ReferenceData> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading reference data from {}", path.display()))?;
    parse_reference_data(&text)
}

/// Ask and bid of one item as published by the marketplace; -1 means no orders.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    #[serde(default, deserialize_with = "price_or_unavailable")]
    pub ask: Option<Decimal>,
    #[serde(default, deserialize_with = "price_or_unavailable")]
    pub bid: Option<Decimal>,
}

/// Marketplace payload: quotes by item display name plus the snapshot time in unix seconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub market: BTreeMap<String, MarketQuote>,
    #[serde(default)]
    pub time: i64,
}

pub fn parse_market_snapshot(json: &str) -> Result<MarketSnapshot> {
    serde_json::from_str(json).context("parsing market JSON")
}

pub fn load_market_snapshot(path: impl AsRef<Path>) -> Result<MarketSnapshot> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading market data from {}", path.display()))?;
    parse_market_snapshot(&text)
}

/// Market book for every catalog item.
///
/// Vendor prices come from the catalog. Quotes are matched to items by display
/// name; without a snapshot the book only knows vendor prices, which is how a
/// failed or pending market fetch is treated.
pub fn build_market_book(data: &ReferenceData, snapshot: Option<&MarketSnapshot>) -> MarketBook {
    let mut book = MarketBook::default();
    for item in data.items.values() {
        book.insert(item.hrid.clone(), MarketValue::vendor_only(item.sell_price));
    }
    let Some(snapshot) = snapshot else {
        info!(items = book.len(), "no market snapshot, vendor prices only");
        return book;
    };

    let by_name: BTreeMap<&str, &ItemId> = data
        .items
        .values()
        .map(|i| (i.name.as_str(), &i.hrid))
        .collect();
    let mut unmatched = 0usize;
    for (name, quote) in &snapshot.market {
        let Some(id) = by_name.get(name.as_str()) else {
            warn!(%name, "market entry matches no catalog item");
            unmatched += 1;
            continue;
        };
        if let Some(value) = book.values.get_mut(*id) {
            value.ask = quote.ask;
            value.bid = quote.bid;
        }
    }
    book.as_of = DateTime::from_timestamp(snapshot.time, 0);
    info!(
        quotes = snapshot.market.len(),
        unmatched,
        as_of = ?book.as_of,
        "market book built"
    );
    book
}
