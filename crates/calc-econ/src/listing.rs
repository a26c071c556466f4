//! Searchable market table.

use calc_core::{ItemId, MarketBook, ReferenceData};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Reverse;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarketListingRow {
    pub item: ItemId,
    pub name: String,
    pub ask: Option<Decimal>,
    pub bid: Option<Decimal>,
}

/// Market rows whose item name or id contains `search` (case-insensitive), highest bid first.
///
/// Items without a bid sort last. Equal bids follow the catalog sort index,
/// with items unknown to the catalog after the rest.
pub fn market_listing(data: &ReferenceData, market: &MarketBook, search: &str) -> Vec<MarketListingRow> {
    let needle = search.trim().to_lowercase();
    let mut rows: Vec<MarketListingRow> = market
        .values
        .iter()
        .filter_map(|(id, value)| {
            let name = data
                .item(id)
                .map(|i| i.name.clone())
                .unwrap_or_else(|| id.leaf().to_string());
            let matches = name.to_lowercase().contains(&needle)
                || id.as_str().to_lowercase().contains(&needle);
            matches.then(|| MarketListingRow {
                item: id.clone(),
                name,
                ask: value.ask,
                bid: value.bid,
            })
        })
        .collect();
    rows.sort_by_key(|r| {
        let catalog_order = data.item(&r.item).map_or(i64::MAX, |i| i.sort_index);
        (Reverse(r.bid), catalog_order)
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::{ConsumableDetail, EquipmentDetail, ItemDetail, MarketValue};

    fn quote(ask: Option<i64>, bid: Option<i64>) -> MarketValue {
        MarketValue {
            ask: ask.map(|v| Decimal::new(v, 0)),
            bid: bid.map(|v| Decimal::new(v, 0)),
            sell_price: Decimal::ONE,
        }
    }

    fn book() -> MarketBook {
        let mut b = MarketBook::default();
        b.insert(ItemId::from("/items/milk"), quote(Some(12), Some(10)));
        b.insert(ItemId::from("/items/cheese"), quote(Some(40), Some(35)));
        b.insert(ItemId::from("/items/cheese_sword"), quote(Some(900), None));
        b
    }

    #[test]
    fn sorted_by_bid_descending() {
        let rows = market_listing(&ReferenceData::default(), &book(), "");
        let ids: Vec<&str> = rows.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(ids, ["/items/cheese", "/items/milk", "/items/cheese_sword"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let rows = market_listing(&ReferenceData::default(), &book(), " CHEESE ");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.name.contains("cheese")));
        assert_eq!(market_listing(&ReferenceData::default(), &book(), "/items/milk").len(), 1);
    }

    fn catalog_item(id: &str, name: &str, sort_index: i64) -> ItemDetail {
        ItemDetail {
            hrid: ItemId::from(id),
            name: name.to_string(),
            category_hrid: String::new(),
            sell_price: Decimal::ONE,
            item_level: 0,
            sort_index,
            consumable_detail: ConsumableDetail::default(),
            equipment_detail: EquipmentDetail::default(),
            enhancement_costs: vec![],
        }
    }

    #[test]
    fn equal_bids_follow_catalog_order() {
        let mut data = ReferenceData::default();
        for (id, name, sort) in [("/items/milk", "Milk", 3), ("/items/cheese", "Cheese", 7), ("/items/egg", "Egg", 1)] {
            data.items.insert(ItemId::from(id), catalog_item(id, name, sort));
        }
        let mut b = MarketBook::default();
        for id in ["/items/cheese", "/items/milk", "/items/egg", "/items/apple"] {
            b.insert(ItemId::from(id), quote(Some(20), Some(15)));
        }
        let rows = market_listing(&data, &b, "");
        let ids: Vec<&str> = rows.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(ids, ["/items/egg", "/items/milk", "/items/cheese", "/items/apple"]);
    }
}
