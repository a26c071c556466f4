//! Per-action throughput: experience, item yield and coin profit per hour.

use crate::buffs::BuffBundle;
use crate::pricing::{PriceResolver, MARKET_TAX_COEFFICIENT};
use crate::rates::{effective_level, effective_seconds, efficiency_multiplier};
use calc_core::{ActionDefinition, ActionId, CharacterInputs, DropTableEntry, ItemDetail, ItemId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Scale a per-attempt figure to per hour.
pub fn per_hour(per_attempt: f64, seconds: f64, efficiency: f64) -> f64 {
    per_attempt / seconds * SECONDS_PER_HOUR * efficiency
}

/// Expected items per attempt of a drop table, before efficiency: Σ dropRate × avgCount × bonus.
pub fn expected_items_per_attempt(table: &[DropTableEntry], bonus: f64) -> f64 {
    table.iter().map(|e| e.expected_per_attempt() * bonus).sum()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemRate {
    pub item: ItemId,
    pub per_hour: f64,
}

/// One computed line of the action table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionRow {
    pub action: ActionId,
    pub name: String,
    pub level_requirement: u32,
    /// Experience per completion, wisdom included.
    pub experience: f64,
    pub seconds: f64,
    pub efficiency: f64,
    pub experience_per_hour: f64,
    /// Primary drops (gathering boosted), rare drops, then production outputs.
    pub items_per_hour: Vec<ItemRate>,
    /// Gross coin value of the primary drop table per attempt, before tax.
    pub profit_per_attempt: f64,
    /// Taxed value of the primary drop table per hour.
    pub profit_per_hour: f64,
    /// Gross coin value of production outputs per attempt, gourmet included.
    pub output_value_per_attempt: f64,
    /// Coin cost of inputs (artisan discounted) and the upgrade item per attempt.
    pub material_cost_per_attempt: f64,
    /// Taxed drop and output value minus material cost, per hour.
    pub net_profit_per_hour: f64,
}

/// Compute the row of a single action.
pub fn compute_row(
    action: &ActionDefinition,
    character: &CharacterInputs,
    buffs: &BuffBundle,
    prices: &PriceResolver<'_>,
) -> ActionRow {
    let seconds = effective_seconds(action.base_time_cost, character.tool_bonus_or_zero());
    let level = effective_level(character.level, buffs.level);
    let level_requirement = action.level_requirement.level;
    let efficiency = efficiency_multiplier(
        level,
        f64::from(level_requirement),
        buffs.efficiency,
        character.gear_efficiency_or_zero(),
    );
    let experience = action.experience_gain.value * buffs.wisdom;

    let mut items_per_hour = Vec::new();
    let mut profit_per_attempt = 0.0;
    for entry in &action.drop_table {
        let count = entry.expected_per_attempt() * buffs.gathering;
        profit_per_attempt += count * prices.price_f64(&entry.item_hrid);
        items_per_hour.push(ItemRate {
            item: entry.item_hrid.clone(),
            per_hour: per_hour(count, seconds, efficiency),
        });
    }
    for entry in &action.rare_drop_table {
        items_per_hour.push(ItemRate {
            item: entry.item_hrid.clone(),
            per_hour: per_hour(entry.expected_per_attempt(), seconds, efficiency),
        });
    }

    let mut output_value_per_attempt = 0.0;
    for out in &action.output_items {
        let count = out.count * buffs.gourmet;
        output_value_per_attempt += count * prices.price_f64(&out.item_hrid);
        items_per_hour.push(ItemRate {
            item: out.item_hrid.clone(),
            per_hour: per_hour(count, seconds, efficiency),
        });
    }

    let mut material_cost_per_attempt: f64 = action
        .input_items
        .iter()
        .map(|i| i.count * buffs.artisan * prices.price_f64(&i.item_hrid))
        .sum();
    if let Some(upgrade) = &action.upgrade_item_hrid {
        material_cost_per_attempt += prices.price_f64(upgrade);
    }

    let profit_per_hour = per_hour(profit_per_attempt, seconds, efficiency) * MARKET_TAX_COEFFICIENT;
    let net_per_attempt = (profit_per_attempt + output_value_per_attempt) * MARKET_TAX_COEFFICIENT
        - material_cost_per_attempt;

    ActionRow {
        action: action.hrid.clone(),
        name: action.name.clone(),
        level_requirement,
        experience,
        seconds,
        efficiency,
        experience_per_hour: per_hour(experience, seconds, efficiency),
        items_per_hour,
        profit_per_attempt,
        profit_per_hour,
        output_value_per_attempt,
        material_cost_per_attempt,
        net_profit_per_hour: per_hour(net_per_attempt, seconds, efficiency),
    }
}

/// One row per action, in the order supplied.
pub fn compute_rows<'a>(
    actions: impl IntoIterator<Item = &'a ActionDefinition>,
    character: &CharacterInputs,
    buffs: &BuffBundle,
    prices: &PriceResolver<'_>,
) -> Vec<ActionRow> {
    let rows: Vec<ActionRow> = actions
        .into_iter()
        .map(|a| compute_row(a, character, buffs, prices))
        .collect();
    debug!(rows = rows.len(), "computed action rows");
    rows
}

/// Distinct catalog items named by the actions' primary drop tables, first appearance first.
pub fn relevant_items<'a, 'b>(
    actions: impl IntoIterator<Item = &'b ActionDefinition>,
    items: &'a BTreeMap<ItemId, ItemDetail>,
) -> Vec<&'a ItemDetail> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for action in actions {
        for entry in &action.drop_table {
            if !seen.insert(entry.item_hrid.clone()) {
                continue;
            }
            if let Some(item) = items.get(&entry.item_hrid) {
                out.push(item);
            }
        }
    }
    out
}
