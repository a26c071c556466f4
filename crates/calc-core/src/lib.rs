#![deny(warnings)]

//! Core domain models and invariants for the action economics engine.
//!
//! This crate defines the serializable reference data (actions, items,
//! monsters), character inputs and market values shared by the calculators,
//! with validation helpers for the reference data provider.

mod catalog;
mod character;
mod config;
mod ids;
mod market;
mod skill;

pub use catalog::{
    ActionDefinition, ConsumableDetail, DropTableEntry, EquipmentDetail, ExperienceGain,
    ItemCount, ItemDetail, LevelRequirement, MonsterDetail, MonsterSpawnInfo, ReferenceData,
    Spawn, COMBAT_FUNCTION, EQUIPMENT_CATEGORY,
};
pub use character::CharacterInputs;
pub use config::{EngineConfig, EstimatorMode};
pub use ids::{ActionId, ItemId, MonsterId, COIN_HRID};
pub use market::{price_or_unavailable, MarketBook, MarketValue, PriceOverrides};
pub use skill::Skill;

use thiserror::Error;
use tracing::debug;

/// Validation errors for reference data invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Drop probability outside [0, 1].
    #[error("drop rate {rate} for {item} is outside [0,1]")]
    InvalidDropRate { item: String, rate: f64 },
    /// Count range is negative or inverted.
    #[error("invalid count range [{min}, {max}] for {item}")]
    InvalidCountRange { item: String, min: f64, max: f64 },
    /// Numeric field must be finite and non-negative.
    #[error("non-finite or negative value in {0}")]
    NonFinite(String),
    /// Reference to a monster missing from the catalog.
    #[error("unknown monster: {0}")]
    UnknownMonster(String),
    /// Reference to an item missing from the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(String),
    /// Skill name not recognized.
    #[error("unknown skill: {0}")]
    UnknownSkill(String),
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// Validate a single drop table entry.
pub fn validate_drop_entry(entry: &DropTableEntry) -> Result<(), ValidationError> {
    if !entry.drop_rate.is_finite() || !(0.0..=1.0).contains(&entry.drop_rate) {
        return Err(ValidationError::InvalidDropRate {
            item: entry.item_hrid.0.clone(),
            rate: entry.drop_rate,
        });
    }
    if !non_negative(entry.min_count)
        || !non_negative(entry.max_count)
        || entry.min_count > entry.max_count
    {
        return Err(ValidationError::InvalidCountRange {
            item: entry.item_hrid.0.clone(),
            min: entry.min_count,
            max: entry.max_count,
        });
    }
    Ok(())
}

/// Validate a zone's spawn rules. Strength budgets may be infinite.
pub fn validate_spawn_info(info: &MonsterSpawnInfo) -> Result<(), ValidationError> {
    if info.max_total_strength.is_nan() || info.max_total_strength < 0.0 {
        return Err(ValidationError::NonFinite("maxTotalStrength".to_string()));
    }
    for s in &info.spawns {
        if !non_negative(s.rate) || !non_negative(s.strength) {
            return Err(ValidationError::NonFinite(s.combat_monster_hrid.0.clone()));
        }
    }
    Ok(())
}

/// Validate an action definition in isolation.
pub fn validate_action(action: &ActionDefinition) -> Result<(), ValidationError> {
    for entry in action.drop_table.iter().chain(&action.rare_drop_table) {
        validate_drop_entry(entry)?;
    }
    if !non_negative(action.experience_gain.value) {
        return Err(ValidationError::NonFinite(action.hrid.0.clone()));
    }
    for ic in action.input_items.iter().chain(&action.output_items) {
        if !non_negative(ic.count) {
            return Err(ValidationError::NonFinite(ic.item_hrid.0.clone()));
        }
    }
    if let Some(info) = &action.monster_spawn_info {
        validate_spawn_info(info)?;
    }
    Ok(())
}

/// Validate the catalogs, including cross-references from drop tables and spawn lists.
pub fn validate_reference_data(data: &ReferenceData) -> Result<(), ValidationError> {
    let known_item = |id: &ItemId| -> Result<(), ValidationError> {
        if data.items.contains_key(id) {
            Ok(())
        } else {
            Err(ValidationError::UnknownItem(id.0.clone()))
        }
    };
    let known_monster = |id: &MonsterId| -> Result<(), ValidationError> {
        if data.monsters.contains_key(id) {
            Ok(())
        } else {
            Err(ValidationError::UnknownMonster(id.0.clone()))
        }
    };

    for action in data.actions.values() {
        validate_action(action)?;
        for entry in action.drop_table.iter().chain(&action.rare_drop_table) {
            known_item(&entry.item_hrid)?;
        }
        if let Some(info) = &action.monster_spawn_info {
            for s in &info.spawns {
                known_monster(&s.combat_monster_hrid)?;
            }
            for boss in &info.boss_fight_monsters {
                known_monster(boss)?;
            }
        }
    }
    for monster in data.monsters.values() {
        for entry in monster.drop_table.iter().chain(&monster.rare_drop_table) {
            validate_drop_entry(entry)?;
            known_item(&entry.item_hrid)?;
        }
    }
    debug!(
        actions = data.actions.len(),
        items = data.items.len(),
        monsters = data.monsters.len(),
        "reference data validated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn item(id: &str) -> ItemDetail {
        ItemDetail {
            hrid: ItemId::from(id),
            name: id.to_string(),
            category_hrid: String::new(),
            sell_price: Decimal::new(5, 0),
            item_level: 0,
            sort_index: 0,
            consumable_detail: ConsumableDetail::default(),
            equipment_detail: EquipmentDetail::default(),
            enhancement_costs: vec![],
        }
    }

    fn zone(spawns: Vec<Spawn>, bosses: Vec<&str>) -> ActionDefinition {
        ActionDefinition {
            hrid: ActionId::from("/actions/combat/fly"),
            name: "Fly".to_string(),
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
                spawns,
                max_spawn_count: 1,
                max_total_strength: f64::INFINITY,
                boss_fight_monsters: bosses.into_iter().map(MonsterId::from).collect(),
            }),
            sort_index: 0,
        }
    }

    fn spawn(id: &str) -> Spawn {
        Spawn {
            combat_monster_hrid: MonsterId::from(id),
            rate: 1.0,
            strength: 1.0,
        }
    }

    #[test]
    fn rejects_bad_drop_entries() {
        assert!(matches!(
            validate_drop_entry(&DropTableEntry::new("/items/a", 1.5, 1.0, 1.0)),
            Err(ValidationError::InvalidDropRate { .. })
        ));
        assert!(matches!(
            validate_drop_entry(&DropTableEntry::new("/items/a", 0.5, 3.0, 1.0)),
            Err(ValidationError::InvalidCountRange { .. })
        ));
        assert!(validate_drop_entry(&DropTableEntry::new("/items/a", f64::NAN, 1.0, 1.0)).is_err());
    }

    #[test]
    fn reference_data_cross_references() {
        let mut data = ReferenceData::default();
        data.items.insert(ItemId::from("/items/coin"), item("/items/coin"));
        data.monsters.insert(
            MonsterId::from("/monsters/fly"),
            MonsterDetail {
                hrid: MonsterId::from("/monsters/fly"),
                name: "Fly".to_string(),
                drop_table: vec![DropTableEntry::new("/items/coin", 1.0, 5.0, 10.0)],
                rare_drop_table: vec![],
            },
        );
        let z = zone(vec![spawn("/monsters/fly")], vec!["/monsters/fly"]);
        data.actions.insert(z.hrid.clone(), z);
        assert_eq!(validate_reference_data(&data), Ok(()));

        let bad = zone(vec![spawn("/monsters/ghost")], vec![]);
        data.actions.insert(ActionId::from("/actions/combat/ghost"), bad);
        assert_eq!(
            validate_reference_data(&data),
            Err(ValidationError::UnknownMonster("/monsters/ghost".to_string()))
        );
    }

    #[test]
    fn unknown_drop_item_is_reported() {
        let mut data = ReferenceData::default();
        data.monsters.insert(
            MonsterId::from("/monsters/fly"),
            MonsterDetail {
                hrid: MonsterId::from("/monsters/fly"),
                name: "Fly".to_string(),
                drop_table: vec![DropTableEntry::new("/items/wing", 0.1, 1.0, 1.0)],
                rare_drop_table: vec![],
            },
        );
        assert_eq!(
            validate_reference_data(&data),
            Err(ValidationError::UnknownItem("/items/wing".to_string()))
        );
    }

    proptest! {
        #[test]
        fn valid_entries_pass(rate in 0.0f64..=1.0, min in 0.0f64..100.0, extra in 0.0f64..100.0) {
            let e = DropTableEntry::new("/items/x", rate, min, min + extra);
            prop_assert!(validate_drop_entry(&e).is_ok());
            prop_assert!(e.expected_per_attempt() >= 0.0);
        }

        #[test]
        fn negative_spawn_weights_fail(rate in -100.0f64..-0.001) {
            let mut s = spawn("/monsters/fly");
            s.rate = rate;
            let z = zone(vec![s], vec![]);
            prop_assert!(validate_action(&z).is_err());
        }
    }
}
