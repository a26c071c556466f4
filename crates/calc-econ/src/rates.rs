//! Action rate formulas: seconds per action, efficiency and tool bonuses.

use calc_core::{ItemDetail, Skill};

/// No action completes faster than this, however bonuses stack.
pub const MIN_ACTION_SECONDS: f64 = 3.0;

const NANOS_PER_SECOND: f64 = 1e9;

/// Seconds per action after the tool speed bonus, floored at [`MIN_ACTION_SECONDS`].
///
/// Example:
/// assert_eq!(effective_seconds(6_000_000_000, 0.0), 6.0);
/// assert_eq!(effective_seconds(6_000_000_000, 100.0), 3.0);
pub fn effective_seconds(base_time_cost_nanos: u64, tool_bonus_percent: f64) -> f64 {
    let secs = base_time_cost_nanos as f64 / NANOS_PER_SECOND / (1.0 + tool_bonus_percent / 100.0);
    secs.max(MIN_ACTION_SECONDS)
}

/// Character level (1 when unset) plus the flat level bonus of active teas.
pub fn effective_level(character_level: Option<u32>, level_bonus: f64) -> f64 {
    f64::from(character_level.unwrap_or(1)) + level_bonus
}

/// Completions per attempt from overleveling, tea and gear.
///
/// `max(1, (100 + level - requirement)/100) + tea + gear/100`. Being under the
/// requirement never drops the level term below 1.
pub fn efficiency_multiplier(
    effective_level: f64,
    level_requirement: f64,
    efficiency_tea_bonus: f64,
    gear_efficiency_percent: f64,
) -> f64 {
    let level_term = ((100.0 + effective_level - level_requirement) / 100.0).max(1.0);
    level_term + efficiency_tea_bonus + gear_efficiency_percent / 100.0
}

/// Tool bonus in percent for `skill`, including the tool's enhancement level.
///
/// The enhancement bonus is scaled by `multiplier_table[tool_level]`; a level
/// beyond the table contributes no enhancement bonus.
pub fn tool_bonus_percent(
    tool: &ItemDetail,
    skill: Skill,
    tool_level: u32,
    multiplier_table: &[f64],
) -> f64 {
    let stat = skill.tool_stat();
    let detail = &tool.equipment_detail;
    let base = detail.noncombat_stats.get(&stat).copied().unwrap_or(0.0);
    let per_level = detail
        .noncombat_enhancement_bonuses
        .get(&stat)
        .copied()
        .unwrap_or(0.0);
    let multiplier = multiplier_table
        .get(tool_level as usize)
        .copied()
        .unwrap_or(0.0);
    (base + per_level * multiplier) * 100.0
}
