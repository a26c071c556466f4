//! Immutable reference data: actions, items, monsters and the tables around them.
//!
//! Field names follow the game's client-data JSON (camelCase). Nullable lists
//! and maps in that JSON deserialize to empty collections.

use crate::ids::{ActionId, ItemId, MonsterId};
use crate::skill::Skill;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Action function identifier shared by all combat zones.
pub const COMBAT_FUNCTION: &str = "/action_functions/combat";

/// Item category identifier of equippable gear (tools included).
pub const EQUIPMENT_CATEGORY: &str = "/item_categories/equipment";

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(d: D) -> Result<Option<ItemId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.filter(|s| !s.is_empty()).map(ItemId))
}

/// One reward line: an item dropped with some probability in a count range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTableEntry {
    pub item_hrid: ItemId,
    /// Probability in [0,1] that the entry drops on one attempt.
    pub drop_rate: f64,
    pub min_count: f64,
    pub max_count: f64,
}

impl DropTableEntry {
    pub fn new(item: impl Into<String>, drop_rate: f64, min_count: f64, max_count: f64) -> Self {
        Self {
            item_hrid: ItemId::new(item),
            drop_rate,
            min_count,
            max_count,
        }
    }

    pub fn average_count(&self) -> f64 {
        (self.min_count + self.max_count) / 2.0
    }

    /// Expected items per attempt: dropRate × (min+max)/2.
    pub fn expected_per_attempt(&self) -> f64 {
        self.drop_rate * self.average_count()
    }
}

/// An item and a fixed quantity, used for production inputs/outputs and enhancement costs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCount {
    pub item_hrid: ItemId,
    pub count: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRequirement {
    #[serde(default)]
    pub skill_hrid: String,
    #[serde(default)]
    pub level: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceGain {
    #[serde(default)]
    pub skill_hrid: String,
    #[serde(default)]
    pub value: f64,
}

/// A weighted entry of a zone's spawn list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spawn {
    pub combat_monster_hrid: MonsterId,
    /// Relative draw weight.
    pub rate: f64,
    /// Encounter strength consumed from the zone's budget.
    pub strength: f64,
}

/// Spawn rules of a combat zone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterSpawnInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub spawns: Vec<Spawn>,
    #[serde(default)]
    pub max_spawn_count: u32,
    #[serde(default)]
    pub max_total_strength: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub boss_fight_monsters: Vec<MonsterId>,
}

impl MonsterSpawnInfo {
    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty() && self.boss_fight_monsters.is_empty()
    }
}

/// A performable activity: gathering, production or a combat zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    pub hrid: ActionId,
    pub name: String,
    /// Action type, e.g. "/action_types/foraging".
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub level_requirement: LevelRequirement,
    /// Base duration in nanoseconds.
    #[serde(default)]
    pub base_time_cost: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience_gain: ExperienceGain,
    #[serde(default, deserialize_with = "null_as_default")]
    pub drop_table: Vec<DropTableEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rare_drop_table: Vec<DropTableEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub input_items: Vec<ItemCount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub output_items: Vec<ItemCount>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub upgrade_item_hrid: Option<ItemId>,
    #[serde(default)]
    pub monster_spawn_info: Option<MonsterSpawnInfo>,
    #[serde(default)]
    pub sort_index: i64,
}

impl ActionDefinition {
    pub fn skill(&self) -> Option<Skill> {
        Skill::from_action_type(&self.action_type)
    }

    pub fn is_combat(&self) -> bool {
        self.function == COMBAT_FUNCTION
    }

    /// Spawn info, treating a zone without spawn data as having none.
    pub fn spawn_info(&self) -> Option<&MonsterSpawnInfo> {
        self.monster_spawn_info.as_ref().filter(|s| !s.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumableDetail {
    /// Action types this consumable may be used in, e.g. {"/action_types/milking": true}.
    #[serde(default, deserialize_with = "null_as_default")]
    pub usable_in_action_type_map: BTreeMap<String, bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub level_requirements: Vec<LevelRequirement>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub noncombat_stats: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub noncombat_enhancement_bonuses: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub hrid: ItemId,
    pub name: String,
    #[serde(default)]
    pub category_hrid: String,
    /// Vendor sell price in coin.
    #[serde(default)]
    pub sell_price: Decimal,
    #[serde(default)]
    pub item_level: u32,
    #[serde(default)]
    pub sort_index: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub consumable_detail: ConsumableDetail,
    #[serde(default, deserialize_with = "null_as_default")]
    pub equipment_detail: EquipmentDetail,
    /// Materials consumed by one enhancement attempt.
    #[serde(default, deserialize_with = "null_as_default")]
    pub enhancement_costs: Vec<ItemCount>,
}

impl ItemDetail {
    pub fn is_usable_in(&self, action_type: &str) -> bool {
        self.consumable_detail
            .usable_in_action_type_map
            .get(action_type)
            .copied()
            .unwrap_or(false)
    }

    pub fn is_tool_for(&self, skill: Skill) -> bool {
        let hrid = skill.hrid();
        self.category_hrid == EQUIPMENT_CATEGORY
            && self
                .equipment_detail
                .level_requirements
                .iter()
                .any(|r| r.skill_hrid == hrid)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterDetail {
    pub hrid: MonsterId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub drop_table: Vec<DropTableEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rare_drop_table: Vec<DropTableEntry>,
}

/// All catalogs supplied by the reference data provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    #[serde(rename = "actionDetailMap", default)]
    pub actions: BTreeMap<ActionId, ActionDefinition>,
    #[serde(rename = "itemDetailMap", default)]
    pub items: BTreeMap<ItemId, ItemDetail>,
    #[serde(rename = "combatMonsterDetailMap", default)]
    pub monsters: BTreeMap<MonsterId, MonsterDetail>,
    /// Cumulative experience required for each level (index = level).
    #[serde(default)]
    pub level_experience_table: Vec<u64>,
    /// Tool enhancement multiplier per tool enhancement level.
    #[serde(default)]
    pub enhancement_level_total_bonus_multiplier_table: Vec<f64>,
}

impl ReferenceData {
    pub fn action(&self, id: &ActionId) -> Option<&ActionDefinition> {
        self.actions.get(id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemDetail> {
        self.items.get(id)
    }

    pub fn monster(&self, id: &MonsterId) -> Option<&MonsterDetail> {
        self.monsters.get(id)
    }

    /// Actions of one type, highest sort index first.
    pub fn actions_of_type(&self, action_type: &str) -> Vec<&ActionDefinition> {
        let mut out: Vec<&ActionDefinition> = self
            .actions
            .values()
            .filter(|a| a.action_type == action_type)
            .collect();
        out.sort_by(|a, b| b.sort_index.cmp(&a.sort_index));
        out
    }

    /// Combat zones, lowest sort index first.
    pub fn combat_zones(&self) -> Vec<&ActionDefinition> {
        let mut out: Vec<&ActionDefinition> =
            self.actions.values().filter(|a| a.is_combat()).collect();
        out.sort_by_key(|a| a.sort_index);
        out
    }

    /// Equipment usable as a tool for `skill`, lowest sort index first.
    pub fn tools_for(&self, skill: Skill) -> Vec<&ItemDetail> {
        let mut out: Vec<&ItemDetail> = self
            .items
            .values()
            .filter(|i| i.is_tool_for(skill))
            .collect();
        out.sort_by_key(|i| i.sort_index);
        out
    }
}
