//! Hourly loot and coin from an encounter-rate estimate.

use crate::estimator::EncounterRateEstimate;
use calc_core::{ItemId, MonsterId, ReferenceData};
use calc_econ::pricing::{to_f64, PriceResolver};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One item's loot, merged across every monster that drops it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LootRow {
    pub item: ItemId,
    pub name: String,
    pub drops_per_hour: f64,
    pub coin_per_item: Decimal,
    pub coin_per_hour: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LootReport {
    /// Items in order of first appearance across the estimate's monsters.
    pub rows: Vec<LootRow>,
    pub total_coin_per_hour: f64,
}

/// Presentation period for hourly figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScale {
    #[default]
    Hour,
    Day,
}

impl TimeScale {
    pub fn factor(self) -> f64 {
        match self {
            TimeScale::Hour => 1.0,
            TimeScale::Day => 24.0,
        }
    }
}

impl LootReport {
    /// Copy of the report with hourly figures expressed per `scale`.
    pub fn scaled(&self, scale: TimeScale) -> LootReport {
        let k = scale.factor();
        LootReport {
            rows: self
                .rows
                .iter()
                .map(|r| LootRow {
                    drops_per_hour: r.drops_per_hour * k,
                    coin_per_hour: r.coin_per_hour * k,
                    ..r.clone()
                })
                .collect(),
            total_coin_per_hour: self.total_coin_per_hour * k,
        }
    }
}

fn item_name(data: &ReferenceData, item: &ItemId) -> String {
    data.item(item)
        .map(|i| i.name.clone())
        .unwrap_or_else(|| item.leaf().to_string())
}

/// Expected loot per hour: dropRate × avgCount × kph × rate, summed per item.
///
/// Each item is priced once, so merged rows carry a single unit price.
pub fn aggregate_loot(
    estimate: &EncounterRateEstimate,
    kph: f64,
    data: &ReferenceData,
    prices: &PriceResolver<'_>,
) -> LootReport {
    if !(kph.is_finite() && kph > 0.0) {
        return LootReport::default();
    }
    let mut rows: Vec<LootRow> = Vec::new();
    let mut index: BTreeMap<ItemId, usize> = BTreeMap::new();
    for (monster_id, rate) in &estimate.rates {
        if *rate <= 0.0 {
            continue;
        }
        let Some(monster) = data.monster(monster_id) else {
            debug!(monster = %monster_id, "monster missing from catalog, no loot");
            continue;
        };
        for entry in &monster.drop_table {
            let drops = entry.expected_per_attempt() * kph * rate;
            match index.get(&entry.item_hrid) {
                Some(&i) => rows[i].drops_per_hour += drops,
                None => {
                    index.insert(entry.item_hrid.clone(), rows.len());
                    rows.push(LootRow {
                        item: entry.item_hrid.clone(),
                        name: item_name(data, &entry.item_hrid),
                        drops_per_hour: drops,
                        coin_per_item: prices.price(&entry.item_hrid),
                        coin_per_hour: 0.0,
                    });
                }
            }
        }
    }
    for row in &mut rows {
        row.coin_per_hour = row.drops_per_hour * to_f64(row.coin_per_item);
    }
    let total_coin_per_hour = rows.iter().map(|r| r.coin_per_hour).sum();
    debug!(items = rows.len(), total_coin_per_hour, "aggregated loot");
    LootReport {
        rows,
        total_coin_per_hour,
    }
}

/// Encounter rate of one monster, with its display name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EncounterRow {
    pub monster: MonsterId,
    pub name: String,
    pub rate: f64,
}

pub fn encounter_rows(estimate: &EncounterRateEstimate, data: &ReferenceData) -> Vec<EncounterRow> {
    estimate
        .rates
        .iter()
        .map(|(m, rate)| EncounterRow {
            monster: m.clone(),
            name: data
                .monster(m)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| m.leaf().to_string()),
            rate: *rate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{EncounterEstimator, StaticTableEstimator};
    use calc_core::{
        ActionDefinition, ActionId, DropTableEntry, ExperienceGain, LevelRequirement, MarketBook,
        MarketValue, MonsterDetail, MonsterSpawnInfo, PriceOverrides, Spawn, COMBAT_FUNCTION,
    };
    use proptest::prelude::*;

    fn monster(id: &str, name: &str, drops: Vec<DropTableEntry>) -> MonsterDetail {
        MonsterDetail {
            hrid: MonsterId::from(id),
            name: name.to_string(),
            drop_table: drops,
            rare_drop_table: vec![],
        }
    }

    fn data() -> ReferenceData {
        let mut d = ReferenceData::default();
        for m in [
            monster(
                "/monsters/fly",
                "Fly",
                vec![
                    DropTableEntry::new("/items/coin", 1.0, 10.0, 20.0),
                    DropTableEntry::new("/items/egg", 0.5, 1.0, 1.0),
                ],
            ),
            monster(
                "/monsters/rat",
                "Rat",
                vec![DropTableEntry::new("/items/egg", 1.0, 2.0, 2.0)],
            ),
        ] {
            d.monsters.insert(m.hrid.clone(), m);
        }
        d
    }

    fn estimate(pairs: &[(&str, f64)]) -> EncounterRateEstimate {
        EncounterRateEstimate {
            rates: pairs.iter().map(|(m, r)| (MonsterId::from(*m), *r)).collect(),
        }
    }

    fn market() -> MarketBook {
        let mut b = MarketBook::default();
        b.insert(
            ItemId::from("/items/egg"),
            MarketValue {
                ask: Some(Decimal::new(12, 0)),
                bid: Some(Decimal::new(8, 0)),
                sell_price: Decimal::ONE,
            },
        );
        b
    }

    #[test]
    fn merges_items_across_monsters() {
        let overrides = PriceOverrides::new();
        let book = market();
        let prices = PriceResolver::new(&overrides, &book);
        let report = aggregate_loot(
            &estimate(&[("/monsters/fly", 1.0), ("/monsters/rat", 0.5)]),
            100.0,
            &data(),
            &prices,
        );
        let ids: Vec<&str> = report.rows.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(ids, ["/items/coin", "/items/egg"]);

        let coin = &report.rows[0];
        assert_eq!(coin.drops_per_hour, 1500.0);
        assert_eq!(coin.coin_per_item, Decimal::ONE);
        assert_eq!(coin.coin_per_hour, 1500.0);

        let egg = &report.rows[1];
        assert_eq!(egg.name, "egg");
        assert_eq!(egg.drops_per_hour, 50.0 + 100.0);
        assert_eq!(egg.coin_per_item, Decimal::new(10, 0));
        assert_eq!(egg.coin_per_hour, 1500.0);
        assert_eq!(report.total_coin_per_hour, 3000.0);
    }

    #[test]
    fn override_applies_to_merged_row() {
        let mut overrides = PriceOverrides::new();
        overrides.insert(ItemId::from("/items/egg"), Decimal::new(3, 0));
        let book = market();
        let prices = PriceResolver::new(&overrides, &book);
        let report = aggregate_loot(
            &estimate(&[("/monsters/fly", 1.0), ("/monsters/rat", 1.0)]),
            10.0,
            &data(),
            &prices,
        );
        let egg = report.rows.iter().find(|r| r.item.as_str() == "/items/egg").unwrap();
        assert_eq!(egg.coin_per_item, Decimal::new(3, 0));
        assert_eq!(egg.coin_per_hour, 25.0 * 3.0);
    }

    #[test]
    fn zero_kph_or_empty_estimate_gives_no_loot() {
        let overrides = PriceOverrides::new();
        let book = MarketBook::default();
        let prices = PriceResolver::new(&overrides, &book);
        let d = data();
        assert_eq!(aggregate_loot(&estimate(&[("/monsters/fly", 1.0)]), 0.0, &d, &prices), LootReport::default());
        assert_eq!(aggregate_loot(&estimate(&[]), 100.0, &d, &prices), LootReport::default());
        let unknown = aggregate_loot(&estimate(&[("/monsters/ghost", 1.0)]), 100.0, &d, &prices);
        assert!(unknown.rows.is_empty());
    }

    #[test]
    fn day_scale_is_presentation_only() {
        let overrides = PriceOverrides::new();
        let book = market();
        let prices = PriceResolver::new(&overrides, &book);
        let report = aggregate_loot(&estimate(&[("/monsters/rat", 1.0)]), 10.0, &data(), &prices);
        let daily = report.scaled(TimeScale::Day);
        assert_eq!(daily.rows[0].drops_per_hour, report.rows[0].drops_per_hour * 24.0);
        assert_eq!(daily.total_coin_per_hour, report.total_coin_per_hour * 24.0);
        assert_eq!(daily.rows[0].coin_per_item, report.rows[0].coin_per_item);
        assert_eq!(report.scaled(TimeScale::Hour), report);
    }

    #[test]
    fn encounter_rows_carry_names() {
        let rows = encounter_rows(&estimate(&[("/monsters/rat", 0.4), ("/monsters/ghost", 0.1)]), &data());
        assert_eq!(rows[0].name, "Rat");
        assert_eq!(rows[1].name, "ghost");
        assert_eq!(rows[1].rate, 0.1);
    }

    #[test]
    fn static_mode_output_is_byte_identical() {
        let zone = ActionDefinition {
            hrid: ActionId::from("/actions/combat/farmland"),
            name: "Farmland".to_string(),
            action_type: "/action_types/combat".to_string(),
            function: COMBAT_FUNCTION.to_string(),
            category: String::new(),
            level_requirement: LevelRequirement::default(),
            base_time_cost: 0,
            experience_gain: ExperienceGain::default(),
            drop_table: vec![],
            rare_drop_table: vec![],
            input_items: vec![],
            output_items: vec![],
            upgrade_item_hrid: None,
            monster_spawn_info: Some(MonsterSpawnInfo {
                spawns: vec![
                    Spawn {
                        combat_monster_hrid: MonsterId::from("/monsters/fly"),
                        rate: 0.7,
                        strength: 1.0,
                    },
                    Spawn {
                        combat_monster_hrid: MonsterId::from("/monsters/rat"),
                        rate: 0.3,
                        strength: 1.0,
                    },
                ],
                max_spawn_count: 2,
                max_total_strength: 5.0,
                boss_fight_monsters: vec![],
            }),
            sort_index: 0,
        };
        let overrides = PriceOverrides::new();
        let book = market();
        let prices = PriceResolver::new(&overrides, &book);
        let d = data();
        let run = || {
            let est = StaticTableEstimator::default().estimate(&zone, 80.0);
            serde_json::to_string(&aggregate_loot(&est, 80.0, &d, &prices)).unwrap()
        };
        assert_eq!(run(), run());
    }

    proptest! {
        #[test]
        fn total_is_sum_of_rows(fly in 0.0f64..3.0, rat in 0.0f64..3.0, kph in 0.0f64..500.0) {
            let overrides = PriceOverrides::new();
            let book = market();
            let prices = PriceResolver::new(&overrides, &book);
            let report = aggregate_loot(
                &estimate(&[("/monsters/fly", fly), ("/monsters/rat", rat)]),
                kph,
                &data(),
                &prices,
            );
            let sum: f64 = report.rows.iter().map(|r| r.coin_per_hour).sum();
            prop_assert_eq!(report.total_coin_per_hour, sum);
            let mut ids: Vec<&ItemId> = report.rows.iter().map(|r| &r.item).collect();
            ids.dedup();
            prop_assert_eq!(ids.len(), report.rows.len());
        }
    }
}
