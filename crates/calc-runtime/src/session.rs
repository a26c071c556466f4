//! Calculator session: catalogs, market data, overrides and caches in one place.

use crate::memo::Memo;
use calc_combat::{
    aggregate_loot, build_estimator, encounter_rows, EncounterEstimator, EncounterRateEstimate,
    EncounterRow, LootReport, TimeScale,
};
use calc_core::{
    ActionDefinition, ActionId, CharacterInputs, EngineConfig, ItemDetail, ItemId, MarketBook,
    PriceOverrides, ReferenceData, Skill,
};
use calc_econ::{
    available_buffs, compute_rows, effective_level, estimate_progression, market_listing,
    plan_enhancement, relevant_items, resolve_buffs, tool_bonus_percent, ActionRow, BuffBundle,
    EnhancementInputs, EnhancementPlan, MarketListingRow, PriceResolver, ProgressionEstimate,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Rows of one action type with the buffs they were computed under.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionTable {
    pub buffs: BuffBundle,
    pub rows: Vec<ActionRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CombatReport {
    pub zone: ActionId,
    pub kph: f64,
    pub encounters: Vec<EncounterRow>,
    pub loot: LootReport,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnhancementRequest {
    pub item: ItemId,
    pub target_level: u32,
    #[serde(default)]
    pub protect_from: Option<u32>,
    /// Unit price of a protection; the enhanced item's own price when unset.
    #[serde(default)]
    pub protection_price: Option<Decimal>,
}

type EncounterKey = (ActionId, u64);

pub struct Calculator {
    data: ReferenceData,
    market: MarketBook,
    overrides: PriceOverrides,
    estimator: Box<dyn EncounterEstimator>,
    encounters: Memo<EncounterKey, EncounterRateEstimate>,
}

impl Calculator {
    pub fn new(data: ReferenceData, market: MarketBook, config: &EngineConfig) -> Self {
        let estimator = build_estimator(config);
        info!(
            actions = data.actions.len(),
            items = data.items.len(),
            market = market.len(),
            estimator = ?estimator.mode(),
            "calculator ready"
        );
        Self {
            data,
            market,
            overrides: PriceOverrides::new(),
            estimator,
            encounters: Memo::default(),
        }
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn market(&self) -> &MarketBook {
        &self.market
    }

    /// Replace market data after a refresh. Cached encounter rates stay valid.
    pub fn set_market(&mut self, market: MarketBook) {
        self.market = market;
    }

    pub fn overrides(&self) -> &PriceOverrides {
        &self.overrides
    }

    /// Set or clear the operator's price for `item`.
    pub fn set_override(&mut self, item: ItemId, price: Option<Decimal>) {
        match price {
            Some(p) => {
                self.overrides.insert(item, p);
            }
            None => {
                self.overrides.remove(&item);
            }
        }
    }

    pub fn prices(&self) -> PriceResolver<'_> {
        PriceResolver::new(&self.overrides, &self.market)
    }

    /// Rows for every action of `action_type`, highest sort index first.
    pub fn action_table<S: AsRef<str>>(
        &self,
        action_type: &str,
        character: &CharacterInputs,
        selected: &[S],
    ) -> ActionTable {
        let buffs = resolve_buffs(selected, Skill::from_action_type(action_type));
        if let Some(message) = buffs.error_message() {
            debug!(%message, "conflicting level teas");
        }
        let rows = compute_rows(
            self.data.actions_of_type(action_type),
            character,
            &buffs,
            &self.prices(),
        );
        ActionTable { buffs, rows }
    }

    /// Items dropped by actions of `action_type`, for price override editing.
    pub fn relevant_items(&self, action_type: &str) -> Vec<&ItemDetail> {
        relevant_items(self.data.actions_of_type(action_type), &self.data.items)
    }

    pub fn available_buffs(&self, action_type: &str) -> Vec<&ItemDetail> {
        available_buffs(self.data.items.values(), action_type)
    }

    /// Tools for `skill` with their bonus at `tool_level`, in percent.
    pub fn tool_bonuses(&self, skill: Skill, tool_level: u32) -> Vec<(&ItemDetail, f64)> {
        let table = &self.data.enhancement_level_total_bonus_multiplier_table;
        self.data
            .tools_for(skill)
            .into_iter()
            .map(|tool| (tool, tool_bonus_percent(tool, skill, tool_level, table)))
            .collect()
    }

    pub fn market_listing(&self, search: &str) -> Vec<MarketListingRow> {
        market_listing(&self.data, &self.market, search)
    }

    /// Encounter rates for `zone`, re-estimated only when the zone or kph changes.
    pub fn encounter_estimate(&mut self, zone: &ActionId, kph: f64) -> Option<EncounterRateEstimate> {
        let zone_def: &ActionDefinition = self.data.actions.get(zone)?;
        let estimator = &mut self.estimator;
        let estimate = self
            .encounters
            .get_or_compute((zone.clone(), kph.to_bits()), || estimator.estimate(zone_def, kph));
        Some(estimate.clone())
    }

    /// Encounter and loot tables for `zone` at `kph`, with hourly figures per `scale`.
    pub fn combat_report(&mut self, zone: &ActionId, kph: f64, scale: TimeScale) -> Option<CombatReport> {
        let estimate = self.encounter_estimate(zone, kph)?;
        let loot = aggregate_loot(&estimate, kph, &self.data, &self.prices()).scaled(scale);
        Some(CombatReport {
            zone: zone.clone(),
            kph,
            encounters: encounter_rows(&estimate, &self.data),
            loot,
        })
    }

    /// How many times encounter rates have been estimated this session.
    pub fn encounter_estimations(&self) -> u64 {
        self.encounters.computations()
    }

    /// Time and actions to reach the character's target level by repeating `action`.
    pub fn progression<S: AsRef<str>>(
        &self,
        action: &ActionId,
        character: &CharacterInputs,
        selected: &[S],
    ) -> Option<ProgressionEstimate> {
        let def = self.data.action(action)?;
        let buffs = resolve_buffs(selected, def.skill());
        let row = compute_rows([def], character, &buffs, &self.prices()).pop()?;
        let table = &self.data.level_experience_table;
        let current = character.experience.unwrap_or_else(|| {
            table
                .get(character.level_or_default() as usize)
                .map(|xp| *xp as f64)
                .unwrap_or(0.0)
        });
        estimate_progression(
            table,
            current,
            character.target_level,
            row.experience,
            row.efficiency,
            row.seconds,
        )
    }

    /// Expected cost of enhancing `request.item`, using the character's enhancing stats.
    pub fn enhancement_plan<S: AsRef<str>>(
        &self,
        request: &EnhancementRequest,
        character: &CharacterInputs,
        selected: &[S],
    ) -> Option<EnhancementPlan> {
        let item = self.data.item(&request.item)?;
        let buffs = resolve_buffs(selected, Some(Skill::Enhancing));
        let inputs = EnhancementInputs {
            enhancing_level: effective_level(character.level, buffs.level),
            tool_success_percent: character.tool_bonus_or_zero(),
            gear_speed_percent: character.gear_speed_or_zero(),
            target_level: request.target_level,
            protect_from: request.protect_from,
            blessed: buffs.blessed,
        };
        Some(plan_enhancement(item, &inputs, &self.prices(), request.protection_price))
    }
}
